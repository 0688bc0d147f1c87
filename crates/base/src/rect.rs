use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl<T: std::ops::Add<Output = T> + PartialOrd + Copy> Rect<T> {
    pub fn contains_rect(&self, other: Rect<T>) -> bool {
        let self_max = self.max();
        let other_max = other.max();
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other_max.x <= self_max.x
            && other_max.y <= self_max.y
    }
}

impl Rect<usize> {
    /// Clip this rectangle to `0..bounds`. Returns `None` when nothing is left.
    pub fn clamped_to(&self, bounds: Vec2<usize>) -> Option<Rect<usize>> {
        let min_x = self.origin.x.min(bounds.x);
        let min_y = self.origin.y.min(bounds.y);
        let max_x = self.origin.x.saturating_add(self.size.x).min(bounds.x);
        let max_y = self.origin.y.saturating_add(self.size.y).min(bounds.y);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(Rect::new(
            Vec2::new(min_x, min_y),
            Vec2::new(max_x - min_x, max_y - min_y),
        ))
    }
}
