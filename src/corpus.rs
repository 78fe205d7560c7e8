use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};

pub const NIETZSCHE_URL: &str = "https://s3.amazonaws.com/text-datasets/nietzsche.txt";

/// The lowercased training text, held in memory as characters so windows can be taken by
/// character offset.
pub struct Corpus {
    chars: Vec<char>,
}

impl Corpus {
    pub fn from_text(text: &str) -> Result<Self> {
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        if chars.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(Corpus { chars })
    }

    /// Load the corpus from a local text file
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = BufReader::new(f);
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::io(path, e))?;
        let corpus = Self::from_text(&text)?;
        info!("corpus length: {} characters", corpus.len());
        Ok(corpus)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Path under `data_dir` where the file behind `url` is cached. Named after the last path
/// segment of the url.
pub fn cache_path(data_dir: &Path, url: &str) -> PathBuf {
    let name = url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("corpus.txt");
    data_dir.join(name)
}

/// Download `url` into `data_dir` unless a cached copy already exists. There is no retry, a
/// failed download is reported to the caller.
pub fn fetch(url: &str, data_dir: &Path) -> Result<PathBuf> {
    let path = cache_path(data_dir, url);
    if path.exists() {
        info!("using cached corpus at {}", path.display());
        return Ok(path);
    }

    info!("downloading corpus from {url}");
    let download = |source| Error::Download {
        url: url.to_string(),
        source,
    };
    let text = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(download)?;

    fs::create_dir_all(data_dir).map_err(|e| Error::io(data_dir, e))?;
    fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
    info!("cached corpus at {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_is_lowercased() {
        let corpus = Corpus::from_text("The Cat SAT").unwrap();
        assert_eq!("the cat sat", corpus.text());
        assert_eq!(11, corpus.len());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(Corpus::from_text(""), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "Hello\nWorld").unwrap();

        let corpus = Corpus::load(&path).unwrap();

        assert_eq!("hello\nworld", corpus.text());
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = Corpus::load(Path::new("does/not/exist.txt")).err().unwrap();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }

    #[test]
    fn cache_path_uses_file_name_of_url() {
        let path = cache_path(Path::new("data"), NIETZSCHE_URL);
        assert_eq!(Path::new("data/nietzsche.txt"), path);
    }

    #[test]
    fn fetch_prefers_cached_file() {
        let dir = tempfile::tempdir().unwrap();
        let cached = dir.path().join("nietzsche.txt");
        fs::write(&cached, "cached").unwrap();

        // The url is never contacted as the file is already present
        let path = fetch(NIETZSCHE_URL, dir.path()).unwrap();

        assert_eq!(cached, path);
    }
}
