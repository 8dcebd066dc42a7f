use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::warn;

use crate::env::ACTION_COUNT;
use crate::state::State;

/// Per-state action values, indexed by [`Action`](crate::env::Action) discriminant
pub type ValueVector = [f64; ACTION_COUNT];

const RECORD_LEN: usize = State::ENCODED_LEN + ACTION_COUNT * 8;

/// The learned mapping from [`State`] to its action-value vector
///
/// The sole piece of cross-episode state. Entries are inserted lazily with
/// zeroed vectors and are never removed within a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    entries: HashMap<State, ValueVector>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the value vector for `state`, inserting a zero vector if absent
    pub fn get_or_create(&mut self, state: State) -> &mut ValueVector {
        self.entries.entry(state).or_default()
    }

    pub fn get(&self, state: &State) -> Option<&ValueVector> {
        self.entries.get(state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a table from its serialized form
    ///
    /// A missing file is a normal first run and yields an empty table. A
    /// malformed or truncated record discards everything read so far and
    /// also yields an empty table, so a damaged file can never abort a run.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e),
        };
        let mut reader = BufReader::new(file);
        let mut entries = HashMap::new();
        let mut record = [0; RECORD_LEN];
        loop {
            match read_record(&mut reader, &mut record)? {
                ReadOutcome::Eof => break,
                ReadOutcome::Truncated => {
                    warn!("value table at {} is truncated, starting empty", path.display());
                    return Ok(Self::new());
                }
                ReadOutcome::Record => {}
            }
            let state_bytes = record[..State::ENCODED_LEN]
                .try_into()
                .expect("slice length matches State::ENCODED_LEN");
            let Some(state) = State::from_bytes(state_bytes) else {
                warn!("value table at {} is malformed, starting empty", path.display());
                return Ok(Self::new());
            };
            let mut values = [0.0; ACTION_COUNT];
            for (i, value) in values.iter_mut().enumerate() {
                let at = State::ENCODED_LEN + 8 * i;
                let bytes = record[at..at + 8]
                    .try_into()
                    .expect("slice length is exactly 8");
                *value = f64::from_le_bytes(bytes);
            }
            entries.insert(state, values);
        }
        Ok(Self { entries })
    }

    /// Overwrite `path` with the complete current table
    ///
    /// Entry order is unspecified. Records are fixed-width with no count
    /// prefix; readers consume until end of stream.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for (state, values) in &self.entries {
            writer.write_all(&state.to_bytes())?;
            for value in values {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        writer.flush()
    }
}

enum ReadOutcome {
    Record,
    Eof,
    Truncated,
}

fn read_record(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Ok(if filled == 0 {
                ReadOutcome::Eof
            } else {
                ReadOutcome::Truncated
            });
        }
        filled += n;
    }
    Ok(ReadOutcome::Record)
}
