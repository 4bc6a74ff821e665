// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Media-type detection from file content, for shells that have bytes but no
// trustworthy declared type (e.g. a file without an extension).

use image::ImageFormat;
use ocrdesk_core::types::ImageKind;

/// Detect the media type of encoded image bytes from their magic number.
///
/// Returns `None` for formats the intake policy has no kind for, so the
/// caller can fall back to a generic type and let validation reject it.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    let kind = match image::guess_format(bytes).ok()? {
        ImageFormat::Png => ImageKind::Png,
        ImageFormat::Jpeg => ImageKind::Jpeg,
        ImageFormat::Gif => ImageKind::Gif,
        ImageFormat::Bmp => ImageKind::Bmp,
        ImageFormat::Tiff => ImageKind::Tiff,
        ImageFormat::WebP => ImageKind::WebP,
        _ => return None,
    };
    Some(kind.mime_type())
}
