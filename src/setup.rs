//! Interactive setup and systemd user-service installation.

use crate::config::{AppPaths, Config, ConfigError, SERVICE_NAME};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to read answer: {0}")]
    Prompt(#[from] io::Error),
    #[error("Input ended before setup was complete")]
    UnexpectedEof,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to install {}: {source}", path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Asks a yes/no question; `y` or `yes` in any case means yes.
pub fn ask_yes_no<R, W>(reader: &mut R, writer: &mut W, question: &str) -> Result<bool, SetupError>
where
    R: BufRead,
    W: Write,
{
    write!(writer, "{} (y/n): ", question)?;
    writer.flush()?;

    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(SetupError::UnexpectedEof);
    }

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Collects both switches from the user.
pub fn collect_config<R, W>(reader: &mut R, writer: &mut W) -> Result<Config, SetupError>
where
    R: BufRead,
    W: Write,
{
    let clean_downloads = ask_yes_no(reader, writer, "Do you want to clean the Downloads folder?")?;
    let delete_node_modules = ask_yes_no(
        reader,
        writer,
        "Do you want to delete unused node_modules folders (30+ days old)?",
    )?;

    Ok(Config {
        clean_downloads,
        delete_node_modules,
    })
}

/// Contents of the systemd user unit that runs the cleanup once per login.
pub fn render_unit_file(binary: &Path, home: &Path) -> String {
    format!(
        "[Unit]
Description=Saafsafai Cleanup Service
After=default.target

[Service]
Type=oneshot
ExecStart={}
Environment=HOME={}

[Install]
WantedBy=default.target
",
        binary.display(),
        home.display()
    )
}

/// Copies the running executable into place and registers the unit.
///
/// Failures of `systemctl` are only logged; the unit file is still written
/// so the user can enable it by hand.
pub fn install_service(paths: &AppPaths) -> Result<PathBuf, SetupError> {
    let install_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| SetupError::Install { path, source }
    };

    let target = paths.installed_binary();
    fs::create_dir_all(&paths.install_dir).map_err(install_err(&paths.install_dir))?;

    let current = std::env::current_exe().map_err(install_err(&target))?;
    if current != target {
        install_binary(&current, &target).map_err(install_err(&target))?;
        println!("✅ Installed binary to: {}", target.display());
    }

    let unit_path = paths.service_file();
    fs::create_dir_all(&paths.systemd_unit_dir).map_err(install_err(&paths.systemd_unit_dir))?;
    fs::write(&unit_path, render_unit_file(&target, &paths.home))
        .map_err(install_err(&unit_path))?;
    info!(unit = %unit_path.display(), "wrote systemd unit");

    for args in [
        &["--user", "daemon-reload"][..],
        &["--user", "enable", SERVICE_NAME][..],
    ] {
        run_systemctl(args);
    }

    println!("✅ Systemd service installed: {}", unit_path.display());
    Ok(unit_path)
}

fn install_binary(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(to, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

fn run_systemctl(args: &[&str]) {
    match Command::new("systemctl").args(args).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(?args, %status, "systemctl exited unsuccessfully"),
        Err(e) => warn!(?args, error = %e, "failed to run systemctl"),
    }
}

/// Runs the whole interactive setup on stdin/stdout.
pub fn run_setup(paths: &AppPaths) -> Result<(), SetupError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut stdout = io::stdout();

    println!("⚙️  Welcome to saafsafai setup!");
    println!();

    let config = collect_config(&mut reader, &mut stdout)?;
    config.save(&paths.config_file)?;
    install_service(paths)?;

    println!();
    println!("✅ Setup complete! saafsafai will run at each boot.");
    println!("📁 Config saved to: {}", paths.config_file.display());
    println!("🔧 To manually run: saafsafai");
    println!("📋 To see logs: ls {}", paths.log_dir.display());
    Ok(())
}
