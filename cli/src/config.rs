pub(crate) fn load(path: &Path) -> anyhow::Result<Config> {
    let mut config = load_inner(path).context("failed to load config file")?;

    match env::var(SECRET_VAR) {
        Ok(secret) => config.secret = Secret::new(secret),
        Err(env::VarError::NotPresent) => {}
        Err(e) => return Err(e).with_context(|| format!("${SECRET_VAR} is invalid")),
    }

    Ok(config)
}

const SECRET_VAR: &str = "SEALED_COOKIES_SECRET";

fn load_inner(path: &Path) -> anyhow::Result<Config> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let config = toml::from_slice::<Config>(&bytes)
        .with_context(|| format!("{} is invalid", path.display()))?;

    Ok(config)
}


use anyhow::Context as _;
use sealed_cookies::Config;
use sealed_cookies::Secret;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
