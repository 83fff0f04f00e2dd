//! Single-frame RGBA decoding at a fixed time offset.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::frame::FrameImage;

/// Build FFmpeg arguments decoding one frame at `timestamp` to raw RGBA on
/// stdout.
fn build_decode_args(path: &Path, timestamp: f64) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", timestamp),
        "-i".to_string(),
        path.to_string_lossy().to_string(),
        "-frames:v".to_string(),
        "1".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        "pipe:1".to_string(),
    ]
}

/// Decode the frame at `timestamp` seconds as raw RGBA pixels.
///
/// `width` and `height` come from probing the source; the decoded buffer is
/// validated against them so a short or padded read surfaces as an error
/// instead of a torn image.
pub async fn decode_frame_rgba(
    path: impl AsRef<Path>,
    timestamp: f64,
    width: u32,
    height: u32,
) -> MediaResult<FrameImage> {
    let path = path.as_ref();

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let args = build_decode_args(path, timestamp);
    debug!("Decoding frame: ffmpeg {}", args.join(" "));

    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffmpeg_failed(
            format!("frame decode at {:.3}s failed", timestamp),
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    let expected = width as usize * height as usize * 4;
    if output.stdout.len() != expected {
        return Err(MediaError::ffmpeg_failed(
            format!(
                "frame decode at {:.3}s returned {} bytes, expected {}",
                timestamp,
                output.stdout.len(),
                expected
            ),
            None,
            None,
        ));
    }

    Ok(FrameImage::new(width, height, output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_args_shape() {
        let args = build_decode_args(Path::new("drive.mp4"), 1.5);

        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"1.500".to_string()));
        assert!(args.contains(&"rawvideo".to_string()));
        assert!(args.contains(&"rgba".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));

        // Seek must come before the input for fast keyframe seeking
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < input);
    }
}
