use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::tables::TableSet;

/// Content hash of a loaded table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSetVersion(String);

impl TableSetVersion {
    // One line per row, tables in fixed order, rows in load order.
    pub fn from_tables(tables: &TableSet) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(b"occurrences\n");
        for record in &tables.occurrences {
            let root = record.root().map(|r| r.as_str()).unwrap_or("");
            let line = format!(
                "{}:{}:{}:{}:{}\n",
                record.sura, record.verse, root, record.form, record.tag
            );
            hasher.update(line.as_bytes());
        }

        hasher.update(b"frequencies\n");
        for row in &tables.frequencies {
            let line = format!(
                "{}:{}:{}:{}:{}:{}\n",
                row.root,
                row.arabic.as_deref().unwrap_or(""),
                row.category,
                row.total,
                row.period_a,
                row.period_b
            );
            hasher.update(line.as_bytes());
        }

        hasher.update(b"cooccurrences\n");
        for pair in &tables.cooccurrences {
            let line = format!("{}:{}:{}\n", pair.root1, pair.root2, pair.count);
            hasher.update(line.as_bytes());
        }

        TableSetVersion(format!("sha256:{}", hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
