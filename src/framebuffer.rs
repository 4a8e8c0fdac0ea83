//! 1-bit packed bitmap view.
//!
//! Rows are `stride` 32-bit words apart; pixel `(x, y)` lives in word
//! `(x >> 5) + y * stride` at bit `x & 31` (LSB-first). A set bit is white.

pub(crate) const SCREEN_W: i32 = 144;
pub(crate) const SCREEN_H: i32 = 168;
/// 160 bits per row.
pub(crate) const ROW_STRIDE_WORDS: usize = 5;

/// Backing words for one full screen.
pub(crate) fn screen_words() -> Vec<u32> {
    vec![0; ROW_STRIDE_WORDS * SCREEN_H as usize]
}

pub(crate) struct Framebuffer<'a> {
    words: &'a mut [u32],
    width: i32,
    height: i32,
    stride: usize,
}

impl<'a> Framebuffer<'a> {
    pub(crate) fn new(words: &'a mut [u32], width: i32, height: i32, stride: usize) -> Self {
        debug_assert!(width >= 0 && height >= 0);
        debug_assert!(width as usize <= stride * 32, "row of {width} px needs more than {stride} words");
        debug_assert!(words.len() >= stride * height as usize, "bitmap too short for {height} rows");
        Self {
            words,
            width,
            height,
            stride,
        }
    }

    pub(crate) fn screen(words: &'a mut [u32]) -> Self {
        Self::new(words, SCREEN_W, SCREEN_H, ROW_STRIDE_WORDS)
    }

    pub(crate) fn width(&self) -> i32 {
        self.width
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn row_stride(&self) -> usize {
        self.stride
    }

    pub(crate) fn words(&self) -> &[u32] {
        &self.words[..]
    }

    /// No clipping: callers keep `(x, y)` on the bitmap.
    #[inline]
    fn locate(&self, x: i32, y: i32) -> (usize, u32) {
        debug_assert!(
            x >= 0 && y >= 0 && x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} bitmap",
            self.width,
            self.height
        );
        ((x >> 5) as usize + y as usize * self.stride, 1 << (x & 31))
    }

    #[inline]
    pub(crate) fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (word, bit) = self.locate(x, y);
        if on {
            self.words[word] |= bit;
        } else {
            self.words[word] &= !bit;
        }
    }

    #[inline]
    pub(crate) fn pixel(&self, x: i32, y: i32) -> bool {
        let (word, bit) = self.locate(x, y);
        self.words[word] & bit != 0
    }

    /// Clipped to the bitmap.
    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        for py in y1..y2 {
            for px in x1..x2 {
                self.set_pixel(px, py, on);
            }
        }
    }

    /// One-pixel outline, clipped to the bitmap.
    pub(crate) fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, on);
        self.fill_rect(x, y + h - 1, w, 1, on);
        self.fill_rect(x, y, 1, h, on);
        self.fill_rect(x + w - 1, y, 1, h, on);
    }

    /// Paint every row with a repeating byte; row `y` uses `pattern[y % 8]`.
    pub(crate) fn fill_pattern(&mut self, pattern: &[u8; 8]) {
        for y in 0..self.height as usize {
            let word = u32::from(pattern[y % 8]) * 0x0101_0101;
            let start = y * self.stride;
            self.words[start..start + self.stride].fill(word);
        }
    }
}
