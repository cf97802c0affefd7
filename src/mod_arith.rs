use std::fmt::Debug;
use std::ops::Rem;
use num::CheckedAdd;
use num::traits::WrappingMul;

/// All register arithmetic wraps at 2^15.
pub const MODULUS: u32 = 1 << 15;

pub fn mod_add<T>(a: &T, b: &T, m: T) -> T
    where T: CheckedAdd + Rem<Output = T> + Debug
{
    match a.checked_add(b) {
        None => panic!("mod_add overflowed with {:?}+{:?}%{:?}", a, b, m),
        Some(ab) => ab % m,
    }
}
pub fn mod_mul<T>(a: T, b: T, m: T) -> T
    where T: WrappingMul + Rem<Output = T> + Copy
{
    a.wrapping_mul(&b) % m
}

/// Register addition. Widens to u32 before reducing so the result never
/// depends on the native word wrapping at some other width.
pub fn add(a: u16, b: u16) -> u16 {
    mod_add(&u32::from(a), &u32::from(b), MODULUS) as u16
}

pub fn mul(a: u16, b: u16) -> u16 {
    mod_mul(u32::from(a), u32::from(b), MODULUS) as u16
}

/// Decrement with wraparound, so `dec(0) == 32767`.
pub fn dec(a: u16) -> u16 {
    add(a, (MODULUS - 1) as u16)
}
