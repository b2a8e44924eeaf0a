use std::cmp::min;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use stress_core::prelude::DelegatedShutdownListener;

/// Displays a progress bar while a time-bounded run executes, so the user can see how long is
/// left.
pub(crate) fn start_progress(
    planned_runtime: Duration,
    mut shutdown_listener: DelegatedShutdownListener,
) {
    std::thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let start_time = Instant::now();
            let total = planned_runtime.as_secs();

            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{wide_bar:.cyan/blue}] [{elapsed_precise} / {msg}]",
                )
                .expect("Failed to set progress style")
                .progress_chars("#>-"),
            );
            pb.set_message(format!(
                "{:02}:{:02}:{:02}",
                total / 3600,
                (total % 3600) / 60,
                total % 60
            ));

            loop {
                if shutdown_listener.should_shutdown() {
                    log::trace!("Progress thread shutting down");
                    pb.finish_and_clear();
                    break;
                }

                pb.set_position(min(start_time.elapsed().as_secs(), total));
                std::thread::sleep(Duration::from_secs(1));
            }
        })
        .expect("Failed to start progress thread");
}
