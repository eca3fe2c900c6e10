use std::fs::File;
use std::path::Path;

use crate::Error;

/// Reads a whole CSV table into typed records.
///
/// A record that fails to deserialize is an input error, not something to
/// skip: graph construction must reject malformed data rather than
/// silently coerce it.
pub(super) fn deserialize_csv_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    csv::Reader::from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(Error::from)
}
