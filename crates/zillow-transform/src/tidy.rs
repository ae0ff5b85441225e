use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::Result;

/// Drops every listed column that is present and returns the ones removed.
pub fn tidy<S: AsRef<str>>(df: &mut DataFrame, drop_columns: &[S]) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for name in drop_columns {
        let name = name.as_ref();
        if df.column(name).is_ok() {
            df.drop_in_place(name)?;
            removed.push(name.to_string());
        }
    }
    debug!(removed = removed.len(), remaining = df.width(), "tidy complete");
    Ok(removed)
}
