// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable file size labels ("512 B", "1.5 KB", "2.00 MB").

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Format a byte count for display.
///
/// - below 1024: whole bytes, `"512 B"`
/// - below 1024 × 1024: kibibytes with one decimal, `"1.5 KB"`
/// - otherwise: mebibytes with two decimals, `"1.50 MB"`
///
/// Thresholds compare the raw byte count, so 1,048,575 bytes is
/// `"1024.0 KB"`. Fractional input is accepted; negative and NaN input is
/// treated as zero.
pub fn size_label(bytes: f64) -> String {
    let bytes = if bytes.is_nan() || bytes < 0.0 { 0.0 } else { bytes };

    if bytes < KIB {
        format!("{} B", bytes.trunc() as u64)
    } else if bytes < MIB {
        format!("{} KB", fixed(bytes / KIB, 1))
    } else {
        format!("{} MB", fixed(bytes / MIB, 2))
    }
}

/// `value` with exactly `decimals` decimal places, ties rounded away from
/// zero. `format!("{:.N}")` rounds ties to even, so 1.25 would print as
/// "1.2" rather than "1.3".
pub(crate) fn fixed(value: f64, decimals: u8) -> String {
    let scale = 10f64.powi(i32::from(decimals));
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.prec$}", prec = usize::from(decimals))
}

/// [`size_label`] for an integer byte count.
pub fn size_label_bytes(bytes: u64) -> String {
    size_label(bytes as f64)
}
