//! `mock-wallet init` command — generate a default TOML configuration file.

use std::fs;
use std::path::Path;

use mock_wallet::config::generate_default_config;
use mock_wallet::error::Error;

/// Execute the `init` command.
///
/// Writes a default TOML configuration template to `output`. Refuses to
/// overwrite an existing file unless `force` is `true`.
///
/// # Errors
///
/// Returns an error if the file already exists (without `--force`) or if
/// writing fails.
#[allow(clippy::print_stderr)]
pub fn run(output: &Path, force: bool) -> Result<(), Error> {
    if output.exists() && !force {
        return Err(Error::config(format!(
            "'{}' already exists, use --force to overwrite",
            output.display()
        )));
    }

    fs::write(output, generate_default_config())
        .map_err(|e| Error::config_with(format!("failed to write '{}'", output.display()), e))?;

    eprintln!("Config file written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        run(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), generate_default_config());

        let err = run(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        run(&path, true).unwrap();
    }
}
