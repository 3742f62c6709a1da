use crate::common::*;

/// One exposure-to-thumbnail mapping from the URL table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ExposureUrl {
    #[serde(alias = "EXPNUM")]
    pub expnum: i64,
    #[serde(alias = "URL")]
    pub url: String,
}

/// Load the exposure/URL table, sorted by exposure number.
pub fn load_urls_file<P>(path: P) -> Result<Vec<ExposureUrl>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = fs::File::open(path)
        .with_context(|| format!("failed to read url table '{}'", path.display()))?;
    read_urls(reader).with_context(|| format!("failed to parse url table '{}'", path.display()))
}

fn read_urls<R>(reader: R) -> Result<Vec<ExposureUrl>>
where
    R: io::Read,
{
    let mut records: Vec<ExposureUrl> = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(reader)
        .deserialize()
        .try_collect()?;
    records.sort_by_key(|record| record.expnum);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_sorts_url_table() {
        let table = "\
EXPNUM,URL
674330,https://example.org/y6a1/D00674330_g_TN.png
567812,https://example.org/y6a1/D00567812_r_TN.png
";
        let records = read_urls(table.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].expnum, 567812);
        assert_eq!(records[1].url, "https://example.org/y6a1/D00674330_g_TN.png");
    }

    #[test]
    fn lowercase_header_is_accepted() {
        let table = "expnum,url\n1,https://example.org/a.png\n";
        let records = read_urls(table.as_bytes()).unwrap();
        assert_eq!(records[0].expnum, 1);
    }
}
