use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Total / success / failure bars for a batch of page fetches.
///
/// Every bar is hidden when not running in TUI mode.
pub(crate) struct Progress {
    _multi: Option<MultiProgress>,
    total: ProgressBar,
    success: ProgressBar,
    fails: ProgressBar,
}

impl Progress {
    pub(crate) fn new(len: usize, tui: bool) -> anyhow::Result<Self> {
        if !tui {
            return Ok(Self {
                _multi: None,
                total: ProgressBar::hidden(),
                success: ProgressBar::hidden(),
                fails: ProgressBar::hidden(),
            });
        }

        let multi = MultiProgress::new();

        // pages fetched so far, with the page currently in flight as the message
        let total = multi.add(
            ProgressBar::new(len as u64).with_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.cyan} pages    [{bar:40.cyan/blue}] {pos}/{len} \
                        {elapsed_precise} eta {eta}  {wide_msg:.dim}",
                    )?
                    .progress_chars("=> "),
            ),
        );
        total.enable_steady_tick(Duration::from_millis(120));

        let success = multi.add(
            ProgressBar::new(len as u64)
                .with_style(ProgressStyle::with_template("  decoded  {pos:>4.green} pages")?),
        );
        let fails = multi.add(
            ProgressBar::new(len as u64)
                .with_style(ProgressStyle::with_template("  failed   {pos:>4.red} pages")?),
        );

        Ok(Self {
            _multi: Some(multi),
            total,
            success,
            fails,
        })
    }

    /// Show which page is being fetched.
    pub(crate) fn fetching(&self, page: &str) {
        self.total.set_message(page.to_string());
    }

    pub(crate) fn succeeded(&self) {
        self.success.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn failed(&self) {
        self.fails.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.total.finish_with_message("done");
        self.success.finish();
        self.fails.finish();
    }
}
