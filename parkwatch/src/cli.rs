//! Command-line parsing, kept separate from main for testability.

#[derive(Debug)]
pub struct ParsedArgs {
    pub url: Option<String>,
    pub token: Option<String>,
    pub demo: bool,
    pub poll: bool,
    pub dry_run: bool,
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "parkwatch".into());
    let mut url: Option<String> = None;
    let mut token: Option<String> = None;
    let mut demo = false; // --demo
    let mut poll = false; // --poll
    let mut dry_run = false; // --dry-run

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(format!(
                    "Usage: {prog} [--token TOKEN|-t TOKEN] [--demo] [--poll] [--dry-run] [http://HOST:PORT]"
                ));
            }
            "--token" | "-t" => {
                token = it.next();
            }
            "--demo" => {
                demo = true;
            }
            "--poll" => {
                poll = true;
            }
            "--dry-run" => {
                dry_run = true;
            }
            _ if arg.starts_with("--token=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        token = Some(v.to_string());
                    }
                }
            }
            _ => {
                if url.is_none() {
                    url = Some(arg);
                } else {
                    return Err(format!(
                        "Unexpected argument. Usage: {prog} [--token TOKEN|-t TOKEN] [--demo] [--poll] [--dry-run] [http://HOST:PORT]"
                    ));
                }
            }
        }
    }
    Ok(ParsedArgs {
        url,
        token,
        demo,
        poll,
        dry_run,
    })
}
