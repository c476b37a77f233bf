use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Batch progress: companies visited, passes that completed, passes that ended early or failed.
pub(crate) struct BatchProgress {
    _multi: Option<MultiProgress>,
    pub(crate) total: ProgressBar,
    pub(crate) success: ProgressBar,
    pub(crate) fails: ProgressBar,
}

impl BatchProgress {
    pub(crate) fn hidden() -> Self {
        Self {
            _multi: None,
            total: ProgressBar::hidden(),
            success: ProgressBar::hidden(),
            fails: ProgressBar::hidden(),
        }
    }

    pub(crate) fn new(len: usize) -> Self {
        match multi_progress(len) {
            Ok(progress) => progress,
            Err(_) => Self::hidden(),
        }
    }

    pub(crate) fn finish(&self) {
        self.total.finish_and_clear();
        self.success.finish_and_clear();
        self.fails.finish_and_clear();
    }
}

fn multi_progress(len: usize) -> Result<BatchProgress, indicatif::style::TemplateError> {
    // overall multi progress bar
    let multi = MultiProgress::new();

    // total number of companies to scrape
    let total = multi.add(
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.magenta}\n \
                        {msg:>9.white} |{bar:57.white/grey}| {pos:<2} / {human_len} \
                        ({percent_precise}%) [Time: {elapsed}, ETA: {eta}]",
                )?
                .progress_chars("## "),
        ),
    );
    total.set_message("total");
    total.enable_steady_tick(Duration::from_millis(100));

    // passes that reached the download stage
    let success = multi.insert_after(
        &total,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.green} |{bar:57.green}| {pos:<2.green}")?
                .progress_chars("## "),
        ),
    );
    success.set_message("successes");

    // passes that ended early or failed
    let fails = multi.insert_after(
        &success,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.red} |{bar:57.red}| {pos:<2.red}")?
                .progress_chars("## "),
        ),
    );
    fails.set_message("failures");

    Ok(BatchProgress {
        _multi: Some(multi),
        total,
        success,
        fails,
    })
}
