//! Backdrop - background bitmap window for a desktop host runner
//!
//! `backdrop host` creates the window and pumps its messages;
//! `backdrop send <PATH>` points a running window at a new bitmap.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use backdrop::config::Config;
use backdrop::log;

#[derive(Parser, Debug)]
#[command(name = "backdrop")]
#[command(about = "Background bitmap window for a desktop host runner", long_about = None)]
struct Cli {
    /// Configuration file (default: search %APPDATA%/backdrop, exe dir, cwd)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the background window and run its message loop
    Host {
        /// Bitmap to show initially
        #[arg(long)]
        image: Option<PathBuf>,

        /// Show the window instead of leaving it hidden
        #[arg(long)]
        show: bool,
    },
    /// Send a bitmap path to a running background window
    Send {
        /// Window class to look for (default: from configuration)
        #[arg(long)]
        class: Option<String>,

        /// Path of the .bmp file
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Config {
    let result = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}, using defaults", e);
        Config::default()
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    if config.logging.enabled {
        let log_path = config
            .logging
            .file
            .clone()
            .unwrap_or_else(log::default_log_path);
        log::init(&log_path);
    }
    log!("main() starting: {:?}", cli.command);

    let code = match cli.command {
        Command::Host { image, show } => win::host(&config, image, show),
        Command::Send { class, path } => win::send(&config, class, path),
    };

    log!("Backdrop exited.");
    code
}

#[cfg(windows)]
mod win {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG,
    };

    use backdrop::config::Config;
    use backdrop::log;
    use backdrop::platform::win32::{
        enable_dpi_awareness, find_surface_window, module_instance, send_background_image,
        BackgroundWindow,
    };

    pub fn host(config: &Config, image: Option<PathBuf>, show: bool) -> ExitCode {
        // Enable DPI awareness early
        if let Err(e) = enable_dpi_awareness() {
            log!("Warning: Failed to enable DPI awareness: {:?}", e);
        }

        let instance = match module_instance() {
            Ok(instance) => instance,
            Err(e) => {
                log!("FATAL: GetModuleHandleW failed: {:?}", e);
                eprintln!("Failed to get module handle: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let window = BackgroundWindow::new(config.surface.clone());
        let hwnd = match window.create(instance) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                log!("FATAL: {}", e);
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        log!("Background window created: HWND={:?}", hwnd);

        if let Some(path) = image {
            window.update_background(path);
        }
        if show {
            window.show();
        }

        println!(
            "Background window running (class {}).",
            config.surface.class_name
        );

        // Runs until the window is destroyed or WM_QUIT arrives
        unsafe {
            let mut msg = MSG::default();
            while window.hwnd().is_some() {
                let ret = GetMessageW(&mut msg, None, 0, 0);
                if ret.0 <= 0 {
                    log!("GetMessageW returned {}, exiting loop", ret.0);
                    break;
                }

                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        ExitCode::SUCCESS
    }

    pub fn send(config: &Config, class: Option<String>, path: PathBuf) -> ExitCode {
        let class_name = class.unwrap_or_else(|| config.surface.class_name.clone());
        // The receiving process has its own working directory
        let path = std::path::absolute(&path).unwrap_or(path);

        let result = find_surface_window(&class_name)
            .and_then(|target| send_background_image(target, &path));

        match result {
            Ok(()) => {
                println!("Sent {} to {}", path.display(), class_name);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log!("send failed: {}", e);
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(windows))]
mod win {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use backdrop::config::Config;

    pub fn host(_config: &Config, _image: Option<PathBuf>, _show: bool) -> ExitCode {
        eprintln!("backdrop host requires Windows");
        ExitCode::FAILURE
    }

    pub fn send(_config: &Config, _class: Option<String>, _path: PathBuf) -> ExitCode {
        eprintln!("backdrop send requires Windows");
        ExitCode::FAILURE
    }
}
