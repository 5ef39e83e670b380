/// Read access to an interleaved raster, one row slice at a time.
///
/// A row holds `width() * CHANNELS` samples laid out pixel after pixel.
pub trait ImageView {
    type Sample: Copy;

    /// Number of interleaved samples per pixel.
    const CHANNELS: usize;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Samples between the starts of consecutive rows.
    fn row_len(&self) -> usize {
        self.width() * Self::CHANNELS
    }

    fn row(&self, y: usize) -> &[Self::Sample];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    fn as_slice(&self) -> &[Self::Sample];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Sample];

    fn as_mut_slice(&mut self) -> &mut [Self::Sample];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Sample];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.image.height().saturating_sub(self.y);
        (left, Some(left))
    }
}
