use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::model::ModelSummary;
use super::source::AssetSource;
use crate::error::AssetError;
use crate::scene::{NodeId, SceneNode, SceneRegistry, Transform};

/// One asset to load and where it goes in the registry.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub path: PathBuf,
    pub target: NodeId,
    pub name: String,
    pub initial_transform: Transform,
}

impl LoadRequest {
    pub fn new(path: impl Into<PathBuf>, target: NodeId, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target,
            name: name.into(),
            initial_transform: Transform::IDENTITY,
        }
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.initial_transform = transform;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// A node that entered the registry during a drain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedNode {
    pub id: NodeId,
    pub transform: Transform,
}

struct Completion {
    ticket: LoadTicket,
    request: LoadRequest,
    result: Result<ModelSummary, AssetError>,
}

/// Runs each load on its own worker thread; only the owning thread touches the registry.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    statuses: HashMap<LoadTicket, LoadStatus>,
    next_ticket: u64,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            source,
            sender,
            receiver,
            statuses: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn load(&mut self, request: LoadRequest) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.statuses.insert(ticket, LoadStatus::Pending);

        log::info!("Loading {:?} as {} ({})", request.path, request.target, request.name);

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let path = request.path.clone();
        // Loads stay off the rayon pool; the frame path uses it for motion.
        let spawned = thread::Builder::new()
            .name(format!("asset-load-{}", ticket.0))
            .spawn(move || {
                let result = source.load(&request.path);
                // the loader may be gone by now; nothing to report to
                let _ = sender.send(Completion {
                    ticket,
                    request,
                    result,
                });
            });

        if let Err(e) = spawned {
            log::error!("Failed to start load of {:?}: {}", path, e);
            self.statuses.insert(ticket, LoadStatus::Failed(e.to_string()));
        }

        ticket
    }

    pub fn status(&self, ticket: LoadTicket) -> Option<&LoadStatus> {
        self.statuses.get(&ticket)
    }

    /// Number of requests that have not been drained yet.
    pub fn pending(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| matches!(s, LoadStatus::Pending))
            .count()
    }

    /// Applies every completion that has arrived so far. Never blocks.
    pub fn drain_completed(&mut self, registry: &mut SceneRegistry) -> Vec<LoadedNode> {
        let mut loaded = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            if let Some(node) = self.apply(completion, registry) {
                loaded.push(node);
            }
        }
        loaded
    }

    /// Blocks until every outstanding request has resolved, applying each one.
    pub fn finish_pending(&mut self, registry: &mut SceneRegistry) -> Vec<LoadedNode> {
        let mut loaded = self.drain_completed(registry);
        while self.pending() > 0 {
            match self.receiver.recv() {
                Ok(completion) => loaded.extend(self.apply(completion, registry)),
                Err(_) => break,
            }
        }
        loaded
    }

    fn apply(&mut self, completion: Completion, registry: &mut SceneRegistry) -> Option<LoadedNode> {
        let Completion {
            ticket,
            request,
            result,
        } = completion;

        let outcome = result.map_err(|e| e.to_string()).and_then(|model| {
            registry
                .insert(
                    request.target,
                    SceneNode {
                        name: request.name.clone(),
                        transform: request.initial_transform,
                        model,
                    },
                )
                .map_err(|e| e.to_string())
        });

        match outcome {
            Ok(()) => {
                log::info!("Loaded {} ({})", request.target, request.name);
                self.statuses.insert(ticket, LoadStatus::Loaded);
                Some(LoadedNode {
                    id: request.target,
                    transform: request.initial_transform,
                })
            }
            Err(reason) => {
                log::error!("Failed to load {:?}: {}", request.path, reason);
                self.statuses.insert(ticket, LoadStatus::Failed(reason));
                None
            }
        }
    }
}
