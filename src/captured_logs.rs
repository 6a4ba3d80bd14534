/// Formatted `tracing` output, collected from every thread that runs under [`Self::dispatch`].
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn dispatch(&self) -> Dispatch {
        let logs = self.clone();
        Dispatch::new(
            tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_ansi(false)
                .with_writer(move || logs.clone())
                .finish(),
        )
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing::Level;
