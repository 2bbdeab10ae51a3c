//! The order file and its primitive operations.
//!
//! The file is a header line followed by record lines in append order.
//! Lines that do not decode are kept verbatim as opaque lines. The only
//! ways the file changes are [`OrderStore::append`] and
//! [`OrderStore::atomic_rewrite`]; the latter writes a temporary file next
//! to the original and renames it into place, so a failure at any step
//! leaves the original untouched.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::date::DateRules;
use crate::error::{Error, Result};
use crate::record::{HEADER, Order, TextLimit, decode, encode, is_header_shaped};
use crate::rewrite::LineTransform;

/// One classified line of the store file.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// The header-shaped first line.
    Header(String),
    /// A line that decoded into a record.
    Record { raw: String, order: Order },
    /// Any other line, passed through untouched.
    Opaque(String),
    /// A line that is not valid UTF-8, kept as raw bytes.
    Binary(Vec<u8>),
}

impl Line {
    fn classify(index: usize, raw: String) -> Self {
        if index == 0 && is_header_shaped(&raw) {
            return Line::Header(raw);
        }
        match decode(&raw) {
            Some(order) => Line::Record { raw, order },
            None => Line::Opaque(raw),
        }
    }

    fn from_bytes(index: usize, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(raw) => Self::classify(index, raw),
            Err(e) => Line::Binary(e.into_bytes()),
        }
    }

    /// The line as read, without its `\n` terminator.
    pub fn raw(&self) -> &[u8] {
        match self {
            Line::Header(raw) | Line::Opaque(raw) => raw.as_bytes(),
            Line::Record { raw, .. } => raw.as_bytes(),
            Line::Binary(bytes) => bytes,
        }
    }

    /// The line text, unless the line is not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        match self {
            Line::Header(raw) | Line::Opaque(raw) => Some(raw),
            Line::Record { raw, .. } => Some(raw),
            Line::Binary(_) => None,
        }
    }

    /// The decoded record, if this is a record line.
    pub fn order(&self) -> Option<&Order> {
        match self {
            Line::Record { order, .. } => Some(order),
            _ => None,
        }
    }

    pub fn into_order(self) -> Option<Order> {
        match self {
            Line::Record { order, .. } => Some(order),
            _ => None,
        }
    }
}

/// Per-deployment settings for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    /// Rules applied to order dates on input and on edit.
    pub date_rules: DateRules,
    /// Length policy applied to customer and product names.
    pub text_limit: TextLimit,
}

/// Line counts from one rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteSummary {
    pub lines_read: usize,
    pub lines_written: usize,
    pub lines_dropped: usize,
}

/// Handle on one order file.
#[derive(Debug, Clone)]
pub struct OrderStore {
    path: PathBuf,
    options: StoreOptions,
}

impl OrderStore {
    /// A store on `path` with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, StoreOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Create the file holding just the header if it is missing or empty.
    pub fn ensure_initialized(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&self.path, e)),
        }
        fs::write(&self.path, format!("{HEADER}\n")).map_err(|e| Error::io(&self.path, e))?;
        info!(path = %self.path.display(), "initialized order file");
        Ok(())
    }

    /// Stream the file's lines in order. A missing file has no lines.
    pub fn lines(&self) -> Result<LineReader> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        Ok(LineReader {
            reader,
            path: self.path.clone(),
            index: 0,
        })
    }

    /// Read and classify every line of the file.
    pub fn read_all(&self) -> Result<Vec<Line>> {
        let lines = self.lines()?.collect::<Result<Vec<_>>>()?;
        debug!(path = %self.path.display(), lines = lines.len(), "read order file");
        Ok(lines)
    }

    /// Is there any record with this id?
    pub fn exists(&self, order_id: i64) -> Result<bool> {
        for line in self.lines()? {
            if line?.order().is_some_and(|o| o.order_id == order_id) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Add a record as the last line of the file.
    ///
    /// Id uniqueness is not checked here; see [`OrderStore::exists`].
    pub fn append(&self, order: &Order) -> Result<()> {
        order.check_encodable()?;
        self.ensure_initialized()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;

        let mut text = String::new();
        if missing_final_newline(&mut file).map_err(|e| Error::io(&self.path, e))? {
            text.push('\n');
        }
        text.push_str(&encode(order));

        file.write_all(text.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| Error::io(&self.path, e))?;
        info!(order_id = order.order_id, "appended order");
        Ok(())
    }

    /// Rebuild the file by passing every line through `transform`.
    ///
    /// The output goes to a temporary file in the same directory, which
    /// replaces the original only after every line has been written and
    /// synced. The replacement carries the original's permissions. On any
    /// failure the temporary file is removed and the original is left as it
    /// was. A missing file is initialized with its header first.
    pub fn atomic_rewrite<T>(&self, transform: &mut T) -> Result<RewriteSummary>
    where
        T: LineTransform + ?Sized,
    {
        self.ensure_initialized()?;
        let permissions = fs::metadata(&self.path)
            .map_err(|e| Error::io(&self.path, e))?
            .permissions();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        let temp_path = temp.path().to_path_buf();
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::io(&temp_path, e))?;
        let mut summary = RewriteSummary::default();

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for line in self.lines()? {
                let line = line?;
                summary.lines_read += 1;
                let output = transform.process(&line).inspect_err(|e| {
                    warn!(stage = transform.name(), error = %e, "rewrite aborted");
                })?;
                match output {
                    Some(bytes) => {
                        writer
                            .write_all(&bytes)
                            .and_then(|_| writer.write_all(b"\n"))
                            .map_err(|e| Error::io(&temp_path, e))?;
                        summary.lines_written += 1;
                    }
                    None => summary.lines_dropped += 1,
                }
            }
            writer.flush().map_err(|e| Error::io(&temp_path, e))?;
        }

        temp.as_file()
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;
        temp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;

        debug!(
            stage = transform.name(),
            read = summary.lines_read,
            written = summary.lines_written,
            dropped = summary.lines_dropped,
            "rewrite committed"
        );
        Ok(summary)
    }
}

fn missing_final_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Iterator over the classified lines of a store file.
pub struct LineReader {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    index: usize,
}

impl Iterator for LineReader {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut raw = Vec::new();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                let line = Line::from_bytes(self.index, raw);
                self.index += 1;
                Some(Ok(line))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(Error::io(&self.path, e)))
            }
        }
    }
}
