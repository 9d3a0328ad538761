//! App icon extraction.
//!
//! Pulls the first icon out of an executable with `ExtractIconExW`,
//! renders it into a 32×32 GDI bitmap, and encodes the pixels as a
//! base64 PNG data URL ready for display. Every failure path returns
//! `None` — a missing icon never fails an enumeration.

use std::path::Path;

use base64::Engine;
use image::{ImageEncoder, Rgba, RgbaImage};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, CreateCompatibleBitmap, CreateCompatibleDC, DIB_RGB_COLORS,
    DeleteDC, DeleteObject, GetDC, GetDIBits, ReleaseDC, SelectObject,
};
use windows::Win32::UI::Shell::ExtractIconExW;
use windows::Win32::UI::WindowsAndMessaging::{DI_NORMAL, DestroyIcon, DrawIconEx, HICON};
use windows::core::PCWSTR;

/// Rendered icon edge length in pixels.
const ICON_SIZE: i32 = 32;

/// Extracts the executable's icon as a `data:image/png;base64,…` URL.
pub fn extract_data_url(exe_path: &Path) -> Option<String> {
    let pixels = extract_bgra(exe_path)?;
    encode_png(&pixels)
}

/// Renders the executable's first icon and returns raw BGRA pixels.
fn extract_bgra(exe_path: &Path) -> Option<Vec<u8>> {
    let wide_path: Vec<u16> = exe_path
        .as_os_str()
        .to_string_lossy()
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: ExtractIconExW writes at most one handle into each out
    // slot; invalid handles are checked before use and every GDI object
    // created below is released before returning.
    unsafe {
        let mut large = HICON::default();
        let mut small = HICON::default();
        let count = ExtractIconExW(
            PCWSTR::from_raw(wide_path.as_ptr()),
            0,
            Some(&mut large),
            Some(&mut small),
            1,
        );
        if count == 0 || large.is_invalid() {
            return None;
        }

        let screen_dc = GetDC(None);
        let mem_dc = CreateCompatibleDC(Some(screen_dc));
        let bitmap = CreateCompatibleBitmap(screen_dc, ICON_SIZE, ICON_SIZE);
        let previous = SelectObject(mem_dc, bitmap.into());

        let _ = DrawIconEx(mem_dc, 0, 0, large, ICON_SIZE, ICON_SIZE, 0, None, DI_NORMAL);

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: ICON_SIZE,
                // Negative height selects a top-down bitmap.
                biHeight: -ICON_SIZE,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut pixels = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
        GetDIBits(
            mem_dc,
            bitmap,
            0,
            ICON_SIZE as u32,
            Some(pixels.as_mut_ptr().cast()),
            &mut info,
            DIB_RGB_COLORS,
        );

        SelectObject(mem_dc, previous);
        let _ = DeleteObject(bitmap.into());
        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);
        let _ = DestroyIcon(large);
        if !small.is_invalid() {
            let _ = DestroyIcon(small);
        }

        Some(pixels)
    }
}

/// Converts BGRA pixels into a PNG and wraps it as a data URL.
fn encode_png(bgra: &[u8]) -> Option<String> {
    let size = ICON_SIZE as u32;
    let mut img = RgbaImage::new(size, size);

    for y in 0..size {
        for x in 0..size {
            let idx = ((y * size + x) * 4) as usize;
            let b = bgra[idx];
            let g = bgra[idx + 1];
            let r = bgra[idx + 2];
            let a = bgra[idx + 3];
            // GDI leaves alpha at 0 for icons without an alpha channel;
            // treat those pixels as opaque.
            img.put_pixel(x, y, Rgba([r, g, b, if a == 0 { 255 } else { a }]));
        }
    }

    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(img.as_raw(), size, size, image::ExtendedColorType::Rgba8)
        .ok()?;

    let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
    Some(format!("data:image/png;base64,{b64}"))
}
