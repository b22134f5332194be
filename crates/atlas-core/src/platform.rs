use std::path::PathBuf;

pub fn config_dir() -> PathBuf {
    // On macOS and Linux, always use ~/.config/tune-atlas/
    // (avoid macOS Application Support folder for consistency)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tune-atlas")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tune-atlas")
    }
}

/// Find the yt-dlp binary.
///
/// Searches in order:
/// 1. YT_DLP_PATH environment variable
/// 2. Beside current executable
/// 3. PATH
pub fn find_yt_dlp() -> Option<PathBuf> {
    find_tool("YT_DLP_PATH", &yt_dlp_binary_names())
}

/// Find the ffmpeg binary, same search order as [`find_yt_dlp`] with
/// FFMPEG_PATH as the override variable.
pub fn find_ffmpeg() -> Option<PathBuf> {
    find_tool("FFMPEG_PATH", &ffmpeg_binary_names())
}

fn find_tool(env_var: &str, names: &[String]) -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(path) = std::env::var(env_var) {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    // 2. Beside executable
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            for name in names {
                let candidate = dir.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }
    }

    // 3. PATH
    if let Ok(path) = std::env::var("PATH") {
        #[cfg(unix)]
        let separator = ':';
        #[cfg(windows)]
        let separator = ';';

        for dir in path.split(separator) {
            for name in names {
                let candidate = PathBuf::from(dir).join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn yt_dlp_binary_names() -> Vec<String> {
    #[cfg(windows)]
    return vec!["yt-dlp.exe".to_string(), "yt-dlp".to_string()];

    #[cfg(not(windows))]
    return vec![
        "yt-dlp".to_string(),
        "yt-dlp_macos".to_string(),
        "yt-dlp_linux".to_string(),
    ];
}

fn ffmpeg_binary_names() -> Vec<String> {
    #[cfg(windows)]
    return vec!["ffmpeg.exe".to_string(), "ffmpeg".to_string()];

    #[cfg(not(windows))]
    return vec!["ffmpeg".to_string()];
}
