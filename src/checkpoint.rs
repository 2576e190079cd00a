use crate::util::create_with_backoff;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;

/// Resume checkpoint for batch annotation: the index of the next unprocessed
/// item, optionally paired with the id of the last processed item so a
/// reordered input list is caught instead of silently desynchronizing.
///
/// File format: first line is the integer next-index; an optional second line
/// carries the last-processed id. A hand-edited file holding a bare integer
/// stays valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub next_index: usize,
    pub last_id: Option<String>,
}

impl Checkpoint {
    /// Load from `path`. A missing or empty file is a fresh run (index 0).
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read checkpoint {}", path.display()))
            }
        };
        let mut lines = text.lines();
        let first = lines.next().unwrap_or("").trim();
        if first.is_empty() {
            return Ok(Self::default());
        }
        let next_index: usize = first.parse().with_context(|| {
            format!("checkpoint {} holds a non-integer offset {:?}", path.display(), first)
        })?;
        let last_id = lines
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self { next_index, last_id })
    }

    /// Persist to `path` with a plain truncating write. The annotator orders
    /// this after the output line's flush, so the stored index never exceeds
    /// the number of lines on disk.
    pub fn store(&self, path: &Path) -> Result<()> {
        let mut f = create_with_backoff(path, 16, 50)
            .with_context(|| format!("create checkpoint {}", path.display()))?;
        match &self.last_id {
            Some(id) => write!(f, "{}\n{}\n", self.next_index, id)?,
            None => writeln!(f, "{}", self.next_index)?,
        }
        Ok(())
    }

    /// Abort when the stored id no longer matches the item found at
    /// `next_index - 1`, i.e. the input ordering changed between runs.
    /// Bare-integer checkpoints carry no id and pass unchecked.
    pub fn verify_last_id(&self, actual: Option<&str>) -> Result<()> {
        let Some(expected) = &self.last_id else {
            return Ok(());
        };
        if self.next_index == 0 {
            return Ok(());
        }
        match actual {
            Some(id) if id == expected => Ok(()),
            Some(id) => bail!(
                "checkpoint expected last id {:?} but the item list holds {:?}; \
                 refusing to resume against a reordered input",
                expected,
                id
            ),
            None => bail!(
                "checkpoint index {} lies beyond the item list; \
                 refusing to resume against a shrunken input",
                self.next_index
            ),
        }
    }
}
