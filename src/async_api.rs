use crate::viewer::PageViewer;
use crate::{DisplaySnapshot, Error, Result, ViewerConfig};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Goto(String, oneshot::Sender<Result<()>>),
    Display(oneshot::Sender<Result<()>>),
    Snapshot(oneshot::Sender<Result<DisplaySnapshot>>),
    Screenshot(Option<String>, oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly viewer abstraction backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous `PageViewer` instance and executes
/// commands sent from async tasks, so callers get an async interface while
/// the canvas keeps a single writer. Commands run strictly in order: a
/// `display` issued after a `goto` observes the freshly loaded page.
#[derive(Clone)]
pub struct AsyncViewer {
    cmd_tx: Sender<Command>,
}

impl AsyncViewer {
    /// Create a new viewer (spawns a background thread that owns the engine).
    pub async fn new(config: Option<ViewerConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Initialize the engine on the worker thread
            let mut viewer = match PageViewer::new(config) {
                Ok(v) => v,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            // Signal successful creation (no-op when previous send returned Err)
            let _ = init_tx.send(Ok(()));

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Goto(url, resp) => {
                        let res = viewer.load_url(&url);
                        let _ = resp.send(res);
                    }
                    Command::Display(resp) => {
                        let res = viewer.display_document();
                        let _ = resp.send(res);
                    }
                    Command::Snapshot(resp) => {
                        let res = viewer.snapshot();
                        let _ = resp.send(res);
                    }
                    Command::Screenshot(path_opt, resp) => {
                        let res = viewer.render_png();
                        // If a path is provided, also write to disk
                        if let Ok(ref data) = res {
                            if let Some(path) = path_opt {
                                let _ = std::fs::write(path, data);
                            }
                        }
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let res = viewer.close();
                        let _ = resp.send(res);
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Navigate to a hosting page URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Goto(url.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("Goto canceled: {}", e)))?
    }

    /// Run the display chain for the loaded page
    pub async fn display(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Display(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Display canceled: {}", e)))?
    }

    /// Fetch a snapshot of the last display
    pub async fn snapshot(&self) -> Result<DisplaySnapshot> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Snapshot(tx));
        let res = rx
            .await
            .map_err(|e| Error::Other(format!("Snapshot canceled: {}", e)))?;
        res
    }

    /// Encode the displayed canvas as PNG; if `path` is Some, the bytes will
    /// also be saved to that path.
    pub async fn screenshot(&self, path: Option<&str>) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let path_opt = path.map(|s| s.to_string());
        let _ = self.cmd_tx.send(Command::Screenshot(path_opt, tx));
        let res = rx
            .await
            .map_err(|e| Error::Other(format!("Screenshot canceled: {}", e)))?;
        res
    }

    /// Shutdown the background worker and close the viewer.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
