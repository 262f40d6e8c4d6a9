use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::MakeWriter;

/// Log file attached after the subscriber is installed, once `--log-file`
/// has been parsed. Detached, it swallows output.
#[derive(Clone, Default)]
struct LogFile {
    file: Arc<Mutex<Option<LineWriter<File>>>>,
}

struct LogFileWriter<'a> {
    file: MutexGuard<'a, Option<LineWriter<File>>>,
}

impl LogFile {
    fn attach(&self, file: Option<File>) {
        *self.lock() = file.map(LineWriter::new);
    }

    fn lock(&self) -> MutexGuard<'_, Option<LineWriter<File>>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter { file: self.lock() }
    }
}

impl Write for LogFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// Install the global subscriber writing to stderr and the optional log
/// file. `RUST_LOG` selects the filter, `info` by default; `log` records are
/// bridged into it.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_file = LOG_FILE.get_or_init(LogFile::default).clone();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr.and(log_file))
        .try_init();
}

/// Mirror log output into `path`, or stop mirroring with `None`. A no-op
/// before `init`.
pub fn set_log_file(path: Option<&Path>) -> io::Result<()> {
    let Some(log_file) = LOG_FILE.get() else {
        return Ok(());
    };
    let file = path.map(open_append).transpose()?;
    log_file.attach(file);
    Ok(())
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
