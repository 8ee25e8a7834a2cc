use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::compare::compare_files;

use super::channel::{CompareRequest, CompareResult};

/// Runs document loading and alignment off the UI task.
pub struct CompareWorker {
    request_tx: mpsc::UnboundedSender<CompareRequest>,
    result_rx: mpsc::UnboundedReceiver<CompareResult>,
}

impl CompareWorker {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CompareRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<CompareResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let tx = result_tx.clone();
                debug!(generation = request.generation, "comparison requested");

                tokio::task::spawn_blocking(move || {
                    let output =
                        compare_files(&request.old_path, &request.new_path, request.max_cells)
                            .map_err(|e| {
                                warn!(generation = request.generation, error = %e, "comparison failed");
                                e.to_string()
                            });
                    let _ = tx.send(CompareResult {
                        generation: request.generation,
                        output,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: CompareRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<CompareResult> {
        self.result_rx.try_recv().ok()
    }
}
