//! MTL reader that extracts the diffuse color of one named material.

use std::io::{self, BufRead};

use crate::{
    error::{AssetError, AssetResult},
    text,
};

/// Material name looked up when the caller does not pick one.
pub const DEFAULT_MATERIAL: &str = "Blue";

/// Diffuse color (`Kd`) of material `name`, or `None` if the file has no such
/// block or the block has no `Kd` line.
///
/// `Kd` lines outside the target block are skipped without being parsed. If
/// the block repeats `Kd`, the last one wins.
pub fn find_diffuse<R: BufRead>(reader: R, name: &str) -> AssetResult<Option<[f32; 3]>> {
    let mut in_target = false;
    let mut color = None;

    text::for_each_line(reader, |line_no, line| {
        let line = match line {
            Ok(line) => line,
            Err(bytes) => {
                // Only a garbled `newmtl` or an in-target `Kd` matters.
                match text::leading_tag(bytes) {
                    b"newmtl" => in_target = false,
                    b"Kd" if in_target => {
                        return Err(AssetError::MalformedNumber {
                            line: line_no,
                            content: text::lossy(bytes).trim().to_owned(),
                            what: "diffuse color",
                        });
                    }
                    _ => {}
                }
                return Ok(());
            }
        };
        let trimmed = line.trim();
        let (tag, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        match tag {
            "newmtl" => in_target = rest.trim() == name,
            "Kd" if in_target => color = Some(parse_rgb(rest, trimmed, line_no)?),
            _ => {}
        }
        Ok(())
    })?;

    Ok(color)
}

/// Diffuse color of material `name`, or `fallback` when the block or its
/// `Kd` line is absent.
pub fn resolve_diffuse<R: BufRead>(
    reader: R,
    name: &str,
    fallback: [f32; 3],
) -> AssetResult<[f32; 3]> {
    Ok(find_diffuse(reader, name)?.unwrap_or(fallback))
}

/// Resolve `name` from MTL text; missing material yields `fallback`.
pub fn resolve_diffuse_from_str(
    contents: &str,
    name: &str,
    fallback: [f32; 3],
) -> AssetResult<[f32; 3]> {
    resolve_diffuse(io::Cursor::new(contents), name, fallback)
}

fn parse_rgb(rest: &str, line: &str, line_no: usize) -> AssetResult<[f32; 3]> {
    let mut parts = rest.split_whitespace();
    let mut rgb = [0.0f32; 3];
    for (channel, what) in rgb.iter_mut().zip(["red channel", "green channel", "blue channel"]) {
        let token = parts.next().ok_or_else(|| AssetError::MissingValue {
            line: line_no,
            content: line.to_owned(),
            what,
        })?;
        let value = token.parse::<f32>().map_err(|_| AssetError::MalformedNumber {
            line: line_no,
            content: line.to_owned(),
            what,
        })?;
        if !(0.0..=1.0).contains(&value) {
            log::warn!(
                "Clamping {} {} to [0, 1] on line {}",
                what,
                value,
                line_no
            );
        }
        *channel = value.clamp(0.0, 1.0);
    }
    Ok(rgb)
}
