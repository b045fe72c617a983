//! Input loading.
//!
//! Resolves what the user supplied into a hex string: a literal stream, the
//! contents of a `.txt` file, or the built-in sample when nothing is given.
//! Both a blocking and a Tokio-based file reader are provided.

use std::path::Path;

use log::debug;

use crate::PacketError;

/// Built-in IPv4/UDP datagram used when no input is supplied.
///
/// 169.254.1.233:50983 -> 169.254.1.255:5000, 12 payload bytes, carried
/// checksum 0x99cb.
pub const SAMPLE_HEX_STREAM: &str =
    "45a00028d545000040114cfba9fe01e9a9fe01ffc7271388001499cb434d44000000001ba9fe01ff";

/// Suffix that marks an argument as a file to read rather than literal hex.
const FILE_SUFFIX: &str = ".txt";

/// Returns `true` if `arg` names a hex dump file.
pub fn is_file_reference(arg: &str) -> bool {
    arg.ends_with(FILE_SUFFIX)
}

/// Reads a hex dump file, trimming surrounding whitespace.
pub fn read_hex_file<P: AsRef<Path>>(path: P) -> Result<String, PacketError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Ok(contents.trim().to_string())
}

/// Asynchronously reads a hex dump file, trimming surrounding whitespace.
pub async fn read_hex_file_async<P: AsRef<Path>>(path: P) -> Result<String, PacketError> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(contents.trim().to_string())
}

/// Turns an optional command-line argument into a hex string.
///
/// # Returns
/// - `Ok(String)` - The sample, the file contents, or the literal argument
/// - `Err(PacketError::Io)` - If a named file cannot be read
pub async fn resolve(arg: Option<&str>) -> Result<String, PacketError> {
    match arg {
        None => {
            debug!("no input given, using built-in sample");
            Ok(SAMPLE_HEX_STREAM.to_string())
        }
        Some(path) if is_file_reference(path) => {
            debug!("reading hex stream from {}", path);
            read_hex_file_async(path).await
        }
        Some(literal) => Ok(literal.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("udpsum-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_is_file_reference() {
        assert!(is_file_reference("capture.txt"));
        assert!(!is_file_reference(SAMPLE_HEX_STREAM));
        assert!(!is_file_reference("capture.txt.bak"));
    }

    #[test]
    fn test_read_hex_file() {
        let path = temp_file("sync.txt", &format!("{}\n", SAMPLE_HEX_STREAM));
        assert_eq!(read_hex_file(&path).unwrap(), SAMPLE_HEX_STREAM);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            read_hex_file("/nonexistent/udpsum.txt"),
            Err(PacketError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve() {
        assert_eq!(resolve(None).await.unwrap(), SAMPLE_HEX_STREAM);
        assert_eq!(resolve(Some(" 4011 ")).await.unwrap(), "4011");

        let path = temp_file("async.txt", "  4500001c\r\n");
        let arg = path.to_string_lossy().to_string();
        assert_eq!(resolve(Some(arg.as_str())).await.unwrap(), "4500001c");
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            resolve(Some("/nonexistent/udpsum.txt")).await,
            Err(PacketError::Io(_))
        ));
    }
}
