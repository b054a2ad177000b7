use std::io::{self, Read};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads `pipe` until it is closed, so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buffer)?;
        }

        Ok(buffer)
    })
}

fn join(handle: JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe reader panicked")))
}

/// Runs `command` to completion and collects its output.
///
/// Returns `None` if the command did not exit within `timeout`, in which
/// case it has been killed.
pub fn output_with_timeout(command: &mut Command, timeout: Duration) -> io::Result<Option<Output>> {
    debug!("running {:?} with a timeout of {:?}", command, timeout);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            warn!("killing {:?} after {:?}", command, elapsed);
            // the child might have exited in the meantime
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    };

    Ok(Some(Output {
        status,
        stdout: join(stdout)?,
        stderr: join(stderr)?,
    }))
}
