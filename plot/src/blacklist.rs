use crate::common::*;

/// Exposure/CCD pairs flagged as unusable, sorted by exposure number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    entries: Vec<BlacklistEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlacklistEntry {
    pub expnum: i64,
    pub ccdnum: u32,
}

impl Blacklist {
    /// Parse a whitespace-delimited blacklist table with a header row.
    ///
    /// Column names are matched case-insensitively; EXPNUM and CCDNUM are
    /// required, extra columns are ignored.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read blacklist file '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("failed to parse blacklist file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

        let header: Vec<_> = lines
            .next()
            .ok_or_else(|| format_err!("the blacklist table is empty"))?
            .split_whitespace()
            .map(|name| name.to_uppercase())
            .collect();
        let expnum_col = header
            .iter()
            .position(|name| name == "EXPNUM")
            .ok_or_else(|| format_err!("missing EXPNUM column"))?;
        let ccdnum_col = header
            .iter()
            .position(|name| name == "CCDNUM")
            .ok_or_else(|| format_err!("missing CCDNUM column"))?;

        let mut entries: Vec<BlacklistEntry> = lines
            .map(|line| -> Result<_> {
                let fields: Vec<_> = line.split_whitespace().collect();
                ensure!(
                    fields.len() == header.len(),
                    "expect {} fields, but found {} in line '{}'",
                    header.len(),
                    fields.len(),
                    line
                );

                let expnum = fields[expnum_col]
                    .parse()
                    .with_context(|| format!("invalid EXPNUM in line '{}'", line))?;
                let ccdnum = fields[ccdnum_col]
                    .parse()
                    .with_context(|| format!("invalid CCDNUM in line '{}'", line))?;

                Ok(BlacklistEntry { expnum, ccdnum })
            })
            .try_collect()?;

        // stable sort keeps the CCD order within an exposure
        entries.sort_by_key(|entry| entry.expnum);

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[BlacklistEntry] {
        &self.entries
    }

    /// Exposure numbers present in the table, in ascending order.
    pub fn expnums(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|entry| entry.expnum).dedup()
    }

    /// Blacklisted CCDs of one exposure.
    pub fn ccds(&self, expnum: i64) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.expnum == expnum)
            .map(|entry| entry.ccdnum)
            .collect()
    }
}
