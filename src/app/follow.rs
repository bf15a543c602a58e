//! Growth polling for files and streams that are still being written.

use crate::content::Content;
use crate::logger::Level;
use crate::reactor::ReactorHandle;
use std::sync::Arc;
use std::time::Duration;

pub const MIN_POLL: Duration = Duration::from_millis(10);
pub const MAX_POLL: Duration = Duration::from_secs(1);

/// The content reached `size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentGrew {
    pub size: u64,
}

/// Exponential backoff between polls that saw no new data.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    min: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            current: min,
            min,
            max,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.min;
    }

    pub fn grow(&mut self) {
        self.current = (self.current * 2).min(self.max);
    }
}

/// Spawn the poll thread. It exits when the reactor stops, or, without `follow`,
/// once the content stops arriving; a size error stops the reactor.
pub fn spawn_growth_poller<A>(
    content: Arc<dyn Content>,
    initial_size: u64,
    follow: bool,
    reactor: ReactorHandle<A>,
) -> std::io::Result<std::thread::JoinHandle<()>>
where
    A: From<ContentGrew> + Send + 'static,
{
    std::thread::Builder::new()
        .name("rpager-follow".to_string())
        .spawn(move || {
            let mut backoff = Backoff::new(MIN_POLL, MAX_POLL);
            let mut known = initial_size;
            loop {
                std::thread::sleep(backoff.current());
                if reactor.is_stopping() {
                    break;
                }
                // Checked before the size so the last read sees every byte.
                let last_poll = !follow && !content.is_arriving();
                match content.size() {
                    Ok(size) if size > known => {
                        known = size;
                        backoff.reset();
                        if !reactor.enqueue(A::from(ContentGrew { size }), "follow.grew") {
                            break;
                        }
                    }
                    Ok(_) => backoff.grow(),
                    Err(e) => {
                        reactor.fail(e);
                        break;
                    }
                }
                if last_poll {
                    break;
                }
            }
            reactor
                .log()
                .record(Level::Debug, "follow", "growth poller exiting");
        })
}
