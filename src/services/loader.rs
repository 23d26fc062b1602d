use std::fs;
use std::sync::OnceLock;

use regex::Regex;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::is_remote;
use crate::error::ViewerError;
use crate::services::encoding;

/// Loads and parses a JSON resource. Every call reads the resource again.
pub trait JsonLoader {
    fn load_json(&self, path: &str) -> Result<Value, ViewerError>;
}

/// Reads local files and fetches `http(s)://` URLs.
#[derive(Debug, Default)]
pub struct AssetLoader;

impl JsonLoader for AssetLoader {
    fn load_json(&self, path: &str) -> Result<Value, ViewerError> {
        tracing::debug!(path, "loading json");

        let bytes = if is_remote(path) {
            fetch(path)?
        } else {
            fs::read(path).map_err(|e| ViewerError::Load {
                path: path.to_string(),
                reason: e.to_string(),
            })?
        };

        parse(path, &bytes)
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, ViewerError> {
    let load_err = |reason: String| ViewerError::Load {
        path: url.to_string(),
        reason,
    };

    let client = Client::builder().build().map_err(|e| load_err(e.to_string()))?;
    let resp = client.get(url).send().map_err(|e| load_err(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(load_err(format!("HTTP {}", status.as_u16())));
    }

    let body = resp.bytes().map_err(|e| load_err(e.to_string()))?;
    Ok(body.to_vec())
}

/// Decodes and parses a resource body. Shared by every loader.
pub fn parse(path: &str, bytes: &[u8]) -> Result<Value, ViewerError> {
    let decoded = encoding::decode(bytes);
    if decoded.had_errors {
        tracing::warn!(path, encoding = decoded.encoding, "resource decoded with replacement characters");
    }

    serde_json::from_str(&decoded.text).map_err(|source| ViewerError::Parse {
        path: path.to_string(),
        source,
    })
}

fn file_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^/\\.\x00][^/\\\x00]*$").expect("file name pattern is valid")
    })
}

/// Locale file names are joined under the locale directory, so they must be
/// a single path component: no separators, no leading dot.
pub fn check_file_name(name: &str) -> Result<(), ViewerError> {
    if file_name_re().is_match(name) {
        Ok(())
    } else {
        Err(ViewerError::InvalidFileName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn loads_local_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"a\":{{\"b\":\"hi\"}}}}").unwrap();

        let v = AssetLoader
            .load_json(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(v["a"]["b"], "hi");
    }

    #[test]
    fn missing_file_is_load_error_naming_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let path = path.to_str().unwrap();

        let err = AssetLoader.load_json(path).unwrap_err();
        assert!(matches!(err, ViewerError::Load { .. }));
        assert!(err.to_string().contains(path));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"a\":").unwrap();

        let err = AssetLoader
            .load_json(file.path().to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, ViewerError::Parse { .. }));
    }

    #[test]
    fn file_names_must_be_single_component() {
        for ok in [
            "en.json",
            "pt-BR.json",
            "zh_Hans.json",
            "pt BR.json",
            "日本語.json",
            "en+US.json",
            "v1..2.json",
        ] {
            assert!(check_file_name(ok).is_ok(), "{ok}");
        }
        for bad in ["", ".", "..", "../secret.json", "a/b.json", "a\\b.json", ".hidden", "/etc/passwd"] {
            assert!(check_file_name(bad).is_err(), "{bad}");
        }
    }

    /// Serves one canned HTTP response on a local port and returns its URL.
    fn serve_once(response: String) -> String {
        use std::io::Read;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/assets/locale/fr.json")
    }

    #[test]
    fn http_error_status_is_load_error_naming_the_url() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        );

        let err = AssetLoader.load_json(&url).unwrap_err();
        match &err {
            ViewerError::Load { path, reason } => {
                assert_eq!(path, &url);
                assert_eq!(reason, "HTTP 404");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(err.to_string().contains(&url));
    }

    #[test]
    fn http_success_body_is_parsed() {
        let body = "{\"a\":\"olá\"}";
        let url = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ));

        let v = AssetLoader.load_json(&url).unwrap();
        assert_eq!(v["a"], "olá");
    }
}
