pub mod gpio_led;
pub mod rgb_led;
pub mod traits;

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        pub mod stm32f1;
    }
}
