//! Remote command execution inside containers
//!
//! Creates an exec session through the orchestrator, drains its combined
//! output stream, and returns the decoded text. The in-container exit
//! status is not interpreted: a command whose stream opened and closed
//! counts as executed.

use crate::orchestrator::OrchestratorClient;
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::info;

/// Tokenize a flat command string on whitespace.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}

/// Run `argv` inside the container and return its combined output.
///
/// The whole drain runs under `timeout`; a command that keeps its stream
/// open past the deadline is reported as a failed remote operation.
pub async fn run_in_container(
    client: &dyn OrchestratorClient,
    container_id: &str,
    argv: &[String],
    timeout: Duration,
) -> Result<String> {
    let exec_id = client
        .create_exec(container_id, argv)
        .await
        .with_context(|| format!("creating exec in container {}", container_id))?;

    let mut stream = client
        .start_exec(&exec_id)
        .await
        .with_context(|| format!("attaching exec {} in container {}", exec_id, container_id))?;

    let drained = tokio::time::timeout(timeout, async {
        let mut buffer = Vec::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok::<_, crate::orchestrator::OrchestratorError>(buffer)
    })
    .await;

    let buffer = match drained {
        Ok(result) => {
            result.with_context(|| format!("reading exec output from container {}", container_id))?
        }
        Err(_) => bail!(
            "exec in container {} did not finish within {:?}",
            container_id,
            timeout
        ),
    };

    let output = String::from_utf8_lossy(&buffer).into_owned();
    info!(
        container_id = %container_id,
        output = %output.trim_end(),
        "Command executed"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockOrchestrator;

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("stress-ng --cpu 2 --timeout 9"),
            vec!["stress-ng", "--cpu", "2", "--timeout", "9"]
        );
        assert!(split_command("").is_empty());
        assert_eq!(split_command("  tc   qdisc "), vec!["tc", "qdisc"]);
    }

    #[tokio::test]
    async fn test_drain_reassembles_output_across_chunk_boundaries() {
        let mock = MockOrchestrator::new().with_exec_chunks(vec![
            b"hel".to_vec(),
            b"lo\nwo".to_vec(),
            b"rld".to_vec(),
        ]);

        let argv = split_command("cat /tmp/out");
        let output = run_in_container(&mock, "c1", &argv, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(output, "hello\nworld");
    }

    #[tokio::test]
    async fn test_single_chunk_output() {
        let mock = MockOrchestrator::new().with_exec_chunks(vec![b"ok".to_vec()]);

        let argv = split_command("true");
        let output = run_in_container(&mock, "c1", &argv, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(output, "ok");
    }

    #[tokio::test]
    async fn test_stalled_stream_times_out() {
        let mock = MockOrchestrator::new().with_hung_exec();

        let argv = split_command("sleep 9999");
        let result = run_in_container(&mock, "c1", &argv, Duration::from_millis(50)).await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("did not finish"));
    }
}
