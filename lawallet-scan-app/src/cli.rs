//! Command-line arguments.

use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "lawallet.yaml";
pub const ENV_SECRET_KEY: &str = "LAWALLET_NSEC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Classify each payload and report the outcome.
    Scan(Vec<String>),
    /// Classify a claim-badge link and, if it is one, claim it.
    Claim(String),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: PathBuf,
    pub secret_key: Option<String>,
    pub pubkey: Option<String>,
    pub username: Option<String>,
    pub command: Command,
}

pub fn usage() -> &'static str {
    "Usage:\n  \
     lawallet-scan [OPTIONS] <PAYLOAD>...\n  \
     lawallet-scan [OPTIONS] claim <URL>\n\n\
     Options:\n  \
     --config <PATH>     Wallet config (default: lawallet.yaml)\n  \
     --nsec <HEX>        Secret key for signing (or LAWALLET_NSEC)\n  \
     --pubkey <HEX>      Public key, when no secret key is given\n  \
     --username <NAME>   Wallet username\n  \
     -h, --help          Show this message"
}

/// Parse arguments, program name excluded.
pub fn parse_args<I>(args: I) -> Result<Args, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut secret_key = None;
    let mut pubkey = None;
    let mut username = None;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Ok(Args {
                    config,
                    secret_key,
                    pubkey,
                    username,
                    command: Command::Help,
                })
            }
            "--config" => config = PathBuf::from(value_for(&arg, args.next())?),
            "--nsec" => secret_key = Some(value_for(&arg, args.next())?),
            "--pubkey" => pubkey = Some(value_for(&arg, args.next())?),
            "--username" => username = Some(value_for(&arg, args.next())?),
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            _ => positional.push(arg),
        }
    }

    let command = match positional.first().map(String::as_str) {
        None => return Err("No payload given".to_string()),
        Some("claim") => match positional.as_slice() {
            [_, url] => Command::Claim(url.clone()),
            _ => return Err("claim takes exactly one URL".to_string()),
        },
        Some(_) => Command::Scan(positional),
    };

    Ok(Args {
        config,
        secret_key,
        pubkey,
        username,
        command,
    })
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} requires a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_scan_payloads() {
        let args = parse(&["lnbc1abc", "https://app.lawallet.ar/?c=1"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
        assert_eq!(
            args.command,
            Command::Scan(vec!["lnbc1abc".into(), "https://app.lawallet.ar/?c=1".into()])
        );
    }

    #[test]
    fn test_claim_with_options() {
        let args = parse(&["--config", "/etc/lw.yaml", "--username", "satoshi", "claim", "https://b.example/?definitionid=1"]).unwrap();
        assert_eq!(args.config, PathBuf::from("/etc/lw.yaml"));
        assert_eq!(args.username.as_deref(), Some("satoshi"));
        assert_eq!(args.command, Command::Claim("https://b.example/?definitionid=1".into()));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--nsec"]).is_err());
        assert!(parse(&["--verbose", "x"]).is_err());
        assert!(parse(&["claim"]).is_err());
        assert!(parse(&["claim", "a", "b"]).is_err());
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(&["x", "--help"]).unwrap().command, Command::Help);
    }
}
