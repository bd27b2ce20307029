//! Command-line argument parsing.

/// Command-line arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    /// Optional input to prefill in the launcher.
    pub input: Option<String>,
    /// Request words for the running instance, e.g. `toggle-launcher`.
    pub request: Vec<String>,
}

impl Args {
    /// Parse command-line arguments from `std::env::args()`.
    pub fn parse() -> Self {
        match Self::parse_from(std::env::args().skip(1)) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        }
    }

    pub fn parse_from<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--input" | "-i" => {
                    let value = args
                        .next()
                        .ok_or_else(|| "--input requires a value".to_string())?;
                    parsed.input = Some(value);
                }
                _ => parsed.request.push(arg),
            }
        }

        Ok(parsed)
    }

    /// Whether anything beyond starting the daemon was asked for.
    pub fn has_request(&self) -> bool {
        self.input.is_some() || !self.request.is_empty()
    }
}
