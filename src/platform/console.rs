//! Interactive console prompt for CLI runs.

use super::UserPrompt;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::io::Write;
use tokio::sync::{mpsc, oneshot};

/// One queued question with the slot its answer goes into.
struct Request {
    question: String,
    answer: oneshot::Sender<bool>,
}

/// Asks yes/no questions on stdout and reads answers from stdin.
///
/// All reading happens on a single long-lived blocking task that serves
/// queued questions one at a time. Each question carries a oneshot answer
/// slot; when the asking probe times out and its future is dropped, the
/// slot closes and whatever line the user eventually types for that stale
/// question is discarded. The next question then gets its own fresh read
/// instead of racing an orphaned reader for stdin.
#[derive(Clone)]
pub struct ConsolePrompt {
    requests: mpsc::UnboundedSender<Request>,
}

impl ConsolePrompt {
    /// Creates a prompt reading answers from stdin.
    pub fn new() -> Self {
        Self::with_line_source(|| {
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => None,
                Ok(_) => Some(line),
            }
        })
    }

    /// Creates a prompt over an arbitrary line source, which runs on the
    /// blocking pool. Returning `None` (end of input) shuts the reader down.
    fn with_line_source<F>(mut next_line: F) -> Self
    where
        F: FnMut() -> Option<String> + Send + 'static,
    {
        let (requests, mut queue) = mpsc::unbounded_channel::<Request>();
        tokio::task::spawn_blocking(move || {
            while let Some(request) = queue.blocking_recv() {
                serve(request, &mut next_line);
            }
        });
        Self { requests }
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Prompts for one question until a parseable answer arrives, the asker
/// gives up, or input ends.
fn serve<F>(request: Request, next_line: &mut F)
where
    F: FnMut() -> Option<String>,
{
    let Request { question, answer } = request;
    loop {
        // The asking probe may have timed out; stop consuming input for it.
        if answer.is_closed() {
            return;
        }

        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{} [y/n]: ", question);
        let _ = stdout.flush();

        let Some(line) = next_line() else { return };
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => {
                let _ = answer.send(true);
                return;
            }
            "n" | "no" => {
                let _ = answer.send(false);
                return;
            }
            _ => continue,
        }
    }
}

#[async_trait]
impl UserPrompt for ConsolePrompt {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let (answer, resolved) = oneshot::channel();
        self.requests
            .send(Request {
                question: question.to_string(),
                answer,
            })
            .map_err(|_| anyhow!("prompt reader has shut down"))?;
        resolved.await.context("prompt reader dropped the question")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Prompt backed by a scripted line channel. `reading` signals every
    /// time the reader asks for a line, so tests can synchronize with it.
    fn scripted_prompt() -> (
        ConsolePrompt,
        std::sync::mpsc::Sender<String>,
        mpsc::UnboundedReceiver<()>,
    ) {
        let (lines_tx, lines_rx) = std::sync::mpsc::channel::<String>();
        let (reading_tx, reading_rx) = mpsc::unbounded_channel();
        let prompt = ConsolePrompt::with_line_source(move || {
            let _ = reading_tx.send(());
            lines_rx.recv().ok()
        });
        (prompt, lines_tx, reading_rx)
    }

    #[tokio::test]
    async fn parses_answers_and_reprompts_on_noise() {
        let (prompt, lines, _reading) = scripted_prompt();
        lines.send("maybe\n".to_string()).unwrap();
        lines.send("yes\n".to_string()).unwrap();
        assert!(prompt.confirm("Did you hear it?").await.unwrap());

        lines.send("N\n".to_string()).unwrap();
        assert!(!prompt.confirm("Did you feel it?").await.unwrap());
    }

    #[tokio::test]
    async fn dropped_question_does_not_steal_the_next_answer() {
        let (prompt, lines, mut reading) = scripted_prompt();
        let prompt = Arc::new(prompt);

        // First question: the asker gives up while the reader is blocked
        // waiting for a line, exactly what a deadline expiry does.
        let first = tokio::spawn({
            let prompt = prompt.clone();
            async move { prompt.confirm("A tone was played. Did you hear it?").await }
        });
        reading.recv().await.unwrap();
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        // The line eventually typed for the stale question is discarded;
        // the next question gets the following line.
        let second = tokio::spawn({
            let prompt = prompt.clone();
            async move { prompt.confirm("Is the screen uniform?").await }
        });
        lines.send("y\n".to_string()).unwrap();
        lines.send("n\n".to_string()).unwrap();
        assert!(!second.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn end_of_input_leaves_the_question_unanswered() {
        let (prompt, lines, _reading) = scripted_prompt();
        drop(lines);
        let err = prompt.confirm("Still there?").await.unwrap_err();
        assert!(err.to_string().contains("dropped the question"));
    }
}
