//! Host side of the event bridge: newline-delimited JSON payloads.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

pub struct HostBridge {
    lines: Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>,
}

impl HostBridge {
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::from_reader(file))
    }

    pub fn from_reader(reader: impl AsyncRead + Unpin + Send + 'static) -> Self {
        let reader: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Next non-blank line, or `None` at end of input.
    pub async fn next_payload(&mut self) -> std::io::Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::HostBridge;

    #[tokio::test]
    async fn yields_payloads_and_skips_blank_lines() {
        let input: &'static [u8] = b"{\"name\":\"\"}\n\n   \n{\"name\":\"Hall\"}\r\n";
        let mut bridge = HostBridge::from_reader(input);

        assert_eq!(
            bridge.next_payload().await.unwrap().as_deref(),
            Some("{\"name\":\"\"}")
        );
        assert_eq!(
            bridge.next_payload().await.unwrap().as_deref(),
            Some("{\"name\":\"Hall\"}")
        );
        assert_eq!(bridge.next_payload().await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_delivered() {
        let input: &'static [u8] = b"{}";
        let mut bridge = HostBridge::from_reader(input);
        assert_eq!(bridge.next_payload().await.unwrap().as_deref(), Some("{}"));
        assert_eq!(bridge.next_payload().await.unwrap(), None);
    }
}
