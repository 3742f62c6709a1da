mod common;
pub mod blacklist;
pub mod figure;
pub mod urls;

use crate::{blacklist::Blacklist, common::*, figure::FigureRenderer, urls::ExposureUrl};
use fov::Release;

/// Plot focal-plane blacklist coverage for camera exposures
#[derive(Debug, Clone, StructOpt)]
pub struct Opts {
    /// blacklist table with EXPNUM and CCDNUM columns
    #[structopt(default_value = "ghost-scatter-y6.txt")]
    pub filename: PathBuf,
    /// overwrite existing output figures
    #[structopt(short = "f", long)]
    pub force: bool,
    /// CSV table mapping exposures to thumbnail URLs
    #[structopt(long, default_value = "urls-y6a1.csv")]
    pub urls_file: PathBuf,
    /// output directory for composite figures
    #[structopt(long, default_value = "pngs")]
    pub outdir: PathBuf,
    /// data release naming the thumbnail layout
    #[structopt(long, default_value = "y1a1")]
    pub release: Release,
}

pub fn start(opts: Opts) -> Result<()> {
    let Opts {
        filename,
        force,
        urls_file,
        outdir,
        release,
    } = opts;

    let blacklist = Blacklist::open(&filename)?;
    let expnums: HashSet<i64> = blacklist.expnums().collect();

    // keep the exposures that have blacklisted CCDs
    let urls: Vec<_> = urls::load_urls_file(&urls_file)?
        .into_iter()
        .filter(|record| expnums.contains(&record.expnum))
        .collect();

    if urls.is_empty() {
        warn!("no blacklisted exposure has a thumbnail URL; nothing to do");
        return Ok(());
    }

    fs::create_dir_all(&outdir)
        .with_context(|| format!("failed to create output directory '{}'", outdir.display()))?;

    let renderer = FigureRenderer::new(release)?;

    for (index, record) in urls.iter().enumerate() {
        let ExposureUrl { expnum, url } = record;
        info!("({}/{})", index + 1, urls.len());

        let outfile = outdir.join(output_name(url)?);
        if outfile.exists() && !force {
            info!("found {}; skipping...", outfile.display());
            continue;
        }

        let ccds = blacklist.ccds(*expnum);
        info!("blacklist CCDs for exposure {}: {:?}", expnum, ccds);

        renderer.render(url, &ccds, &outfile)?;
    }

    Ok(())
}

/// Output file name for a thumbnail URL: the URL basename without the
/// thumbnail suffix.
fn output_name(url: &str) -> Result<String> {
    let base = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| format_err!("cannot derive a file name from url '{}'", url))?;
    Ok(base.replace("_TN", ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_thumbnail_suffix() {
        let name = output_name("https://example.org/y6a1/D00123456_g_TN.png").unwrap();
        assert_eq!(name, "D00123456_g.png");

        let name = output_name("D00123456_r.png").unwrap();
        assert_eq!(name, "D00123456_r.png");

        assert!(output_name("https://example.org/y6a1/").is_err());
    }
}
