//! Radial inventory wheel: a hidden/visible selector over a fixed item list.

use glam::Vec2;

pub const DEFAULT_ITEMS: [&str; 4] = ["Pistol", "Rifle", "Lasso", "Food"];

#[derive(Debug, Clone)]
pub struct InventoryWheel {
    items: Vec<String>,
    selected: usize,
    visible: bool,
}

impl Default for InventoryWheel {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect())
    }
}

impl InventoryWheel {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            selected: 0,
            visible: false,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn next_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev_item(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let n = self.items.len();
        self.selected = (self.selected + n - 1) % n;
    }

    /// Use the highlighted item. Items have no effect yet; returns the name used.
    pub fn use_selected(&self) -> Option<&str> {
        let item = self.selected_item()?;
        log::debug!("Used {}", item);
        Some(item)
    }

    /// Slot centers on a circle; slot 0 is straight up, then clockwise on screen.
    pub fn slot_centers(&self, center: Vec2, radius: f32) -> Vec<Vec2> {
        let n = self.items.len();
        (0..n)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / n as f32 - std::f32::consts::FRAC_PI_2;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_on_first_item() {
        let wheel = InventoryWheel::default();
        assert!(!wheel.is_visible());
        assert_eq!(wheel.selected_index(), 0);
        assert_eq!(wheel.selected_item(), Some("Pistol"));
        assert_eq!(wheel.items().len(), 4);
    }

    #[test]
    fn show_and_hide() {
        let mut wheel = InventoryWheel::default();
        wheel.show();
        assert!(wheel.is_visible());
        wheel.hide();
        assert!(!wheel.is_visible());
    }

    #[test]
    fn next_wraps_around() {
        let mut wheel = InventoryWheel::default();
        for steps in 1..=9 {
            wheel.next_item();
            assert_eq!(wheel.selected_index(), steps % 4);
        }
    }

    #[test]
    fn prev_from_first_is_last() {
        let mut wheel = InventoryWheel::default();
        wheel.prev_item();
        assert_eq!(wheel.selected_index(), 3);
        assert_eq!(wheel.selected_item(), Some("Food"));
        wheel.next_item();
        assert_eq!(wheel.selected_index(), 0);
    }

    #[test]
    fn empty_wheel_is_inert() {
        let mut wheel = InventoryWheel::new(Vec::new());
        wheel.next_item();
        wheel.prev_item();
        assert_eq!(wheel.selected_index(), 0);
        assert_eq!(wheel.use_selected(), None);
        assert!(wheel.slot_centers(Vec2::ZERO, 100.0).is_empty());
    }

    #[test]
    fn use_reports_selection() {
        let mut wheel = InventoryWheel::default();
        wheel.next_item();
        wheel.next_item();
        assert_eq!(wheel.use_selected(), Some("Lasso"));
        assert_eq!(wheel.selected_index(), 2);
    }

    #[test]
    fn slots_start_at_top() {
        let wheel = InventoryWheel::default();
        let centers = wheel.slot_centers(Vec2::new(400.0, 300.0), 100.0);
        let expected = [
            Vec2::new(400.0, 200.0),
            Vec2::new(500.0, 300.0),
            Vec2::new(400.0, 400.0),
            Vec2::new(300.0, 300.0),
        ];
        for (got, want) in centers.iter().zip(expected) {
            assert!(got.distance(want) < 1e-3, "{got} != {want}");
        }
    }
}
