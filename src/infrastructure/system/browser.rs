pub trait Browser {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Hands the URL to the OS default browser.
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}
