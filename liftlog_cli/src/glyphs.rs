//! Drawing backend wrapper that renders text from a built-in 5x7 bitmap font.
//!
//! plotters is built without a font engine, so bitmap output would otherwise
//! carry no text at all. Every other primitive is forwarded untouched.

use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind, FontTransform,
};

const GLYPH_HEIGHT: usize = 7;
const SPACE_WIDTH: i32 = 3;

/// Nominal font size (px) drawn at scale 1.
const BASE_SIZE: f64 = 8.0;

pub struct GlyphTextBackend<DB> {
    inner: DB,
}

impl<DB> GlyphTextBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for GlyphTextBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = text_extent(text, scale);
        let dx = match style.anchor().h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Right => -width,
            text_anchor::HPos::Center => -width / 2,
        };
        let dy = match style.anchor().v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -height / 2,
            text_anchor::VPos::Bottom => -height,
        };
        let transform = style.transform();

        let mut cursor_x = dx;
        for ch in text.chars() {
            let Some(glyph) = glyph_for(ch) else {
                cursor_x += scale * SPACE_WIDTH;
                continue;
            };
            for (row, pattern) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if pattern & (1 << (glyph.width - 1 - col)) == 0 {
                        continue;
                    }
                    let x = cursor_x + col as i32 * scale;
                    let y = dy + row as i32 * scale;
                    for sx in 0..scale {
                        for sy in 0..scale {
                            let (rx, ry) = rotate(&transform, x + sx, y + sy);
                            self.inner.draw_pixel((pos.0 + rx, pos.1 + ry), color.clone())?;
                        }
                    }
                }
            }
            cursor_x += scale * (glyph.width as i32 + 1);
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let (w, h) = text_extent(text, glyph_scale(style.size()));
        Ok((w as u32, h as u32))
    }
}

fn glyph_scale(size: f64) -> i32 {
    ((size / BASE_SIZE).round() as i32).max(1)
}

/// Unrotated width and height in pixels.
fn text_extent(text: &str, scale: i32) -> (i32, i32) {
    let cells: i32 = text
        .chars()
        .map(|ch| match glyph_for(ch) {
            Some(glyph) => glyph.width as i32 + 1,
            None => SPACE_WIDTH,
        })
        .sum();
    (cells * scale, GLYPH_HEIGHT as i32 * scale)
}

fn rotate(transform: &FontTransform, x: i32, y: i32) -> (i32, i32) {
    match transform {
        FontTransform::None => (x, y),
        FontTransform::Rotate90 => (-y, x),
        FontTransform::Rotate180 => (-x, -y),
        FontTransform::Rotate270 => (y, -x),
    }
}

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT],
}

fn glyph_for(ch: char) -> Option<Glyph> {
    GLYPHS
        .iter()
        .find(|(c, _, _)| *c == ch)
        .map(|&(_, width, rows)| Glyph { width, rows })
}

#[rustfmt::skip]
const GLYPHS: &[(char, u8, [u8; GLYPH_HEIGHT])] = &[
    ('A', 5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', 5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', 5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', 5, [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
    ('E', 5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', 5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', 5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', 5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', 3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
    ('J', 5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', 5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', 5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', 5, [0b10001, 0b11011, 0b10101, 0b10001, 0b10001, 0b10001, 0b10001]),
    ('N', 5, [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
    ('O', 5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', 5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', 5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', 5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', 5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', 5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', 5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', 5, [0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100]),
    ('W', 5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10101, 0b11011, 0b10001]),
    ('X', 5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', 5, [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', 5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('a', 5, [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111]),
    ('b', 5, [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110]),
    ('c', 5, [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('d', 5, [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111]),
    ('e', 5, [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
    ('f', 5, [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000]),
    ('g', 5, [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    ('h', 5, [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
    ('i', 3, [0b010, 0b000, 0b110, 0b010, 0b010, 0b010, 0b111]),
    ('j', 4, [0b0001, 0b0000, 0b0011, 0b0001, 0b0001, 0b1001, 0b0110]),
    ('k', 4, [0b1000, 0b1000, 0b1001, 0b1010, 0b1100, 0b1010, 0b1001]),
    ('l', 3, [0b110, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
    ('m', 5, [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001]),
    ('n', 5, [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
    ('o', 5, [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('p', 5, [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000]),
    ('q', 5, [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001]),
    ('r', 5, [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
    ('s', 5, [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110]),
    ('t', 5, [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110]),
    ('u', 5, [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101]),
    ('v', 5, [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('w', 5, [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
    ('x', 5, [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
    ('y', 5, [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
    ('z', 5, [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('0', 5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', 3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
    ('2', 5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', 5, [0b11110, 0b00001, 0b00001, 0b00110, 0b00001, 0b00001, 0b11110]),
    ('4', 5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', 5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', 5, [0b01110, 0b10001, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', 5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', 5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', 5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b10001, 0b01110]),
    ('-', 3, [0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000]),
    ('+', 3, [0b000, 0b000, 0b010, 0b111, 0b010, 0b000, 0b000]),
    ('/', 3, [0b001, 0b001, 0b010, 0b010, 0b100, 0b100, 0b100]),
    ('(', 3, [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
    (')', 3, [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
    (':', 1, [0b0, 0b1, 0b0, 0b0, 0b0, 0b1, 0b0]),
    ('.', 1, [0b0, 0b0, 0b0, 0b0, 0b0, 0b0, 0b1]),
    (',', 2, [0b00, 0b00, 0b00, 0b00, 0b00, 0b01, 0b10]),
    ('\'', 1, [0b1, 0b1, 0b0, 0b0, 0b0, 0b0, 0b0]),
    ('_', 5, [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111]),
];
