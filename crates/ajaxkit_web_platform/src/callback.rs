use std::future::Future;
use tokio::task;

/// Something that can drive futures on the event loop
pub trait FutureExecutor {
    fn execute<T: Future<Output = ()> + 'static>(&mut self, future: T);
}

/// A callback invoked by a timer or event. It receives the executor so it can spawn follow-up
/// work (a fetch, for instance) without blocking the loop.
pub struct Callback<T: FutureExecutor, D = ()> {
    #[allow(clippy::type_complexity)]
    spawner: Box<dyn FnMut(&mut T, D)>,
}

impl<T: FutureExecutor, D> Callback<T, D> {
    pub fn new(spawner: impl FnMut(&mut T, D) + 'static) -> Self {
        Self {
            spawner: Box::new(spawner),
        }
    }

    pub fn execute(&mut self, executor: &mut T, data: D) {
        (self.spawner)(executor, data);
    }
}

impl<T: FutureExecutor> Callback<T> {
    pub fn exec(&mut self, executor: &mut T) {
        self.execute(executor, ());
    }
}

impl<T: FutureExecutor, D> std::fmt::Debug for Callback<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}

/// Spawns futures onto the current `LocalSet`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioExecutor;

impl FutureExecutor for TokioExecutor {
    fn execute<T: Future<Output = ()> + 'static>(&mut self, future: T) {
        task::spawn_local(future);
    }
}
