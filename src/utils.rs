use std::{
    collections::VecDeque,
    future::Future,
    sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}},
};


#[macro_export]
macro_rules! log {
    ( $( $t:tt )* ) => {
        web_sys::console::log_1(&format!( $( $t )* ).into());
    }
}


/// Enable better error messages if our code ever panics
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}


/// Sets error flag and message for an egui window
#[inline(always)]
pub fn set_error_for_egui(flag: &Arc<AtomicBool>, msg: &Arc<Mutex<String>>, s: String) {
    flag.store(true, Ordering::Relaxed);
    {
        let mut mutex = msg.lock().unwrap();
        *mutex += s.as_str();
    }
}


/// Executes an async Future on the current thread
#[inline(always)]
pub fn execute_future<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}


/// Vertical scroll offset of the page, in CSS pixels
pub fn scroll_offset() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}


/// Check if a float is zero
#[inline(always)]
pub fn is_float_zero(x: f32, threshold: f32) -> bool {
    return x.abs() < threshold;
}


/// Check if two floats are equal
#[inline(always)]
pub fn are_floats_equal(x: f32, y: f32, threshold: f32) -> bool {
    return is_float_zero(x-y, threshold);
}


/// Incremental moving average over a fixed window
pub struct IncrementalMA {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}
impl IncrementalMA {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    pub fn add(&mut self, v: f64) -> f64 {
        if self.values.len() == self.window {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(v);
        self.sum += v;
        self.sum / self.values.len() as f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_fills_then_slides() {
        let mut ma = IncrementalMA::new(2);
        assert_eq!(ma.add(1.0), 1.0);
        assert_eq!(ma.add(3.0), 2.0);
        // window is full, the first sample falls out
        assert_eq!(ma.add(5.0), 4.0);
    }

    #[test]
    fn float_comparisons() {
        assert!(are_floats_equal(1.0, 1.0 + 1e-7, 1e-5));
        assert!(!are_floats_equal(1.0, 1.1, 1e-5));
    }
}
