//! Bounds-checked view over a host-owned flat `i32` array.
//!
//! The host hands the plugin two raw regions every tick: panel indicator
//! slots and sound-channel instruction codes. The regions are unmanaged —
//! not guaranteed pre-zeroed, size-stable across ticks, or safe to over-read.
//! `IoArray` converts what would be undefined behavior on a raw pointer into
//! a rejected, reportable access.
//!
//! Views never own the memory and must be rebound on every tick; the host
//! may relocate the region between calls.

use crate::error::{AtsError, AtsResult};

/// Bounds-checked accessor over a host-owned flat `i32` array.
///
/// The bound length is authoritative over whatever the underlying region
/// actually holds: index `i` is valid iff `0 <= i < length`. Writes go
/// straight through the pointer — the region is shared, not copied.
#[derive(Debug)]
pub struct IoArray {
    /// Base address of the unmanaged array. Null while unbound.
    base: *mut i32,
    /// Bound element count. -1 while unbound, so every access fails.
    length: i32,
}

impl IoArray {
    /// Default element count of the host's panel/sound arrays.
    pub const DEFAULT_LENGTH: i32 = 256;

    /// A view not bound to any region. Every access fails with
    /// [`AtsError::OutOfRangeAccess`].
    pub const fn unbound() -> Self {
        Self {
            base: core::ptr::null_mut(),
            length: -1,
        }
    }

    /// Bind the view to a host region for the current tick.
    ///
    /// May be called repeatedly; a later bind fully replaces an earlier one.
    /// No ownership transfer takes place.
    ///
    /// # Safety
    ///
    /// `base` must point to at least `length` readable and writable `i32`
    /// slots that stay valid for as long as this binding is used. A null
    /// `base` or negative `length` yields a view that rejects every access.
    pub unsafe fn bind(base: *mut i32, length: i32) -> Self {
        if base.is_null() || length < 0 {
            return Self::unbound();
        }
        Self { base, length }
    }

    /// [`bind`](Self::bind) with the host's default length of 256 slots.
    ///
    /// # Safety
    ///
    /// Same contract as [`bind`](Self::bind) with `length = 256`.
    pub unsafe fn bind_default(base: *mut i32) -> Self {
        unsafe { Self::bind(base, Self::DEFAULT_LENGTH) }
    }

    /// Bound element count. -1 while unbound.
    #[inline]
    pub const fn length(&self) -> i32 {
        self.length
    }

    /// Whether the view is bound to a region.
    #[inline]
    pub const fn is_bound(&self) -> bool {
        !self.base.is_null()
    }

    /// Read the element at `index`.
    ///
    /// Fails with [`AtsError::OutOfRangeAccess`] for `index < 0` or
    /// `index >= length`; no memory access is performed on failure.
    #[inline]
    pub fn get(&self, index: i32) -> AtsResult<i32> {
        self.check(index)?;
        // Bounds verified against the bind contract above.
        Ok(unsafe { *self.base.add(index as usize) })
    }

    /// Write the element at `index`.
    ///
    /// Same bounds contract as [`get`](Self::get). The write is immediately
    /// visible to the host.
    #[inline]
    pub fn set(&mut self, index: i32, value: i32) -> AtsResult<()> {
        self.check(index)?;
        unsafe { *self.base.add(index as usize) = value };
        Ok(())
    }

    #[inline]
    fn check(&self, index: i32) -> AtsResult<()> {
        if index < 0 || index >= self.length {
            return Err(AtsError::OutOfRangeAccess {
                index,
                length: self.length,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_view(buf: &mut [i32]) -> IoArray {
        unsafe { IoArray::bind(buf.as_mut_ptr(), buf.len() as i32) }
    }

    #[test]
    fn in_range_set_then_get() {
        let mut buf = vec![0i32; 8];
        let mut view = bound_view(&mut buf);

        view.set(0, 42).unwrap();
        view.set(7, -7).unwrap();
        assert_eq!(view.get(0), Ok(42));
        assert_eq!(view.get(7), Ok(-7));
    }

    #[test]
    fn writes_land_in_the_backing_region() {
        let mut buf = vec![0i32; 4];
        let mut view = bound_view(&mut buf);
        view.set(2, 1234).unwrap();
        drop(view);
        assert_eq!(buf[2], 1234);
    }

    #[test]
    fn out_of_range_access_rejected() {
        let mut buf = vec![0i32; 4];
        let mut view = bound_view(&mut buf);

        assert_eq!(
            view.get(-1),
            Err(AtsError::OutOfRangeAccess {
                index: -1,
                length: 4
            })
        );
        assert_eq!(
            view.get(4),
            Err(AtsError::OutOfRangeAccess {
                index: 4,
                length: 4
            })
        );
        assert_eq!(
            view.set(4, 1),
            Err(AtsError::OutOfRangeAccess {
                index: 4,
                length: 4
            })
        );
        // Rejected writes leave the region untouched.
        assert_eq!(buf, vec![0i32; 4]);
    }

    #[test]
    fn unbound_view_rejects_everything() {
        let mut view = IoArray::unbound();
        assert!(!view.is_bound());
        assert_eq!(view.length(), -1);
        assert_eq!(
            view.get(0),
            Err(AtsError::OutOfRangeAccess {
                index: 0,
                length: -1
            })
        );
        assert!(view.set(0, 1).is_err());
    }

    #[test]
    fn null_or_negative_bind_degrades_to_unbound() {
        let view = unsafe { IoArray::bind(core::ptr::null_mut(), 256) };
        assert!(!view.is_bound());

        let mut buf = vec![0i32; 4];
        let view = unsafe { IoArray::bind(buf.as_mut_ptr(), -3) };
        assert!(!view.is_bound());
        assert_eq!(view.length(), -1);
    }

    #[test]
    fn rebinding_switches_regions() {
        let mut first = vec![0i32; 4];
        let mut second = vec![0i32; 4];

        let mut view = bound_view(&mut first);
        view.set(1, 10).unwrap();

        let mut view = bound_view(&mut second);
        view.set(1, 20).unwrap();

        assert_eq!(first[1], 10);
        assert_eq!(second[1], 20);
    }

    #[test]
    fn length_is_authoritative_over_the_region() {
        // Region holds 8 slots but the host declares 4: the view must
        // honor the declared length.
        let mut buf = vec![0i32; 8];
        let view = unsafe { IoArray::bind(buf.as_mut_ptr(), 4) };
        assert!(view.get(3).is_ok());
        assert!(view.get(4).is_err());
    }
}
