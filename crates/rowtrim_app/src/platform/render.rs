use engine_logging::engine_debug;
use rowtrim_core::{AppViewModel, DownloadHandle, StatusColor, StatusLine, StatusReporter};

/// Prints status messages; errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter;

impl StatusReporter for TerminalReporter {
    fn report(&self, message: &str, visible: bool, color: StatusColor) {
        if !visible {
            // A terminal cannot take a line back.
            engine_debug!("Status hidden");
            return;
        }
        match color {
            StatusColor::Neutral => println!("{message}"),
            StatusColor::Error => eprintln!("error: {message}"),
        }
    }
}

/// Turns successive view models into terminal output, printing only what changed.
pub struct Renderer<R: StatusReporter> {
    reporter: R,
    last_status: StatusLine,
    last_files: Option<Vec<String>>,
    last_download: Option<DownloadHandle>,
}

impl<R: StatusReporter> Renderer<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            last_status: StatusLine::hidden(),
            last_files: None,
            last_download: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) {
        let files: Vec<String> = view.files.iter().map(|row| row.name.clone()).collect();
        if self.last_files.as_ref() != Some(&files) {
            println!("{}", view.total_files_label);
            for row in &view.files {
                println!("  {:>3}. {} ({} bytes)", row.index + 1, row.name, row.bytes);
            }
            self.last_files = Some(files);
        }

        if view.status != self.last_status {
            view.status.publish(&self.reporter);
            self.last_status = view.status.clone();
        }

        if view.download != self.last_download {
            if let Some(download) = &view.download {
                println!(
                    "Saved {} ({} bytes) to {}",
                    download.file_name,
                    download.byte_len,
                    download.path.display()
                );
            }
            self.last_download = view.download.clone();
        }
    }
}
