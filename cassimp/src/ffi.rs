//! Internal helpers for borrowing Assimp-owned memory.
//!
//! Every helper ties the returned borrow to a caller-chosen lifetime, which in
//! practice is the lifetime of the owning [`crate::Scene`].

use std::marker::PhantomData;

/// Borrow a slice from a raw pointer and element count.
///
/// Returns an empty slice when `ptr` is null or `len == 0`.
///
/// # Safety
/// The memory behind `ptr` must hold `len` initialized `T` for `'a`.
pub(crate) unsafe fn slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    // `from_raw_parts` requires `len * size_of::<T>() <= isize::MAX`; a corrupt
    // scene must not turn into UB.
    let elem_size = std::mem::size_of::<T>();
    if elem_size != 0 && len > (isize::MAX as usize) / elem_size {
        return &[];
    }
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

/// Like [`slice`], but `None` when `ptr` is null.
///
/// # Safety
/// Same as [`slice`].
pub(crate) unsafe fn slice_opt<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { slice(ptr, len) })
    }
}

/// Reinterpret a slice of one `#[repr(C)]` type as another with identical layout.
///
/// # Safety
/// `U` must have the same size and an alignment no stricter than `T`.
pub(crate) unsafe fn cast_slice<T, U>(items: &[T]) -> &[U] {
    debug_assert_eq!(std::mem::size_of::<T>(), std::mem::size_of::<U>());
    debug_assert!(std::mem::align_of::<U>() <= std::mem::align_of::<T>());
    unsafe { std::slice::from_raw_parts(items.as_ptr().cast::<U>(), items.len()) }
}

/// Dereference a possibly-null pointer.
///
/// # Safety
/// A non-null `ptr` must be valid for reads for `'a`.
pub(crate) unsafe fn deref<'a, T>(ptr: *const T) -> Option<&'a T> {
    unsafe { ptr.as_ref() }
}

/// View a NUL-terminated header string constant (as bindgen emits
/// `#define FOO "..."`) as `&str`.
pub(crate) const fn header_str(bytes: &'static [u8]) -> &'static str {
    let trimmed = match bytes.split_last() {
        Some((&0, rest)) => rest,
        _ => bytes,
    };
    match std::str::from_utf8(trimmed) {
        Ok(text) => text,
        Err(_) => panic!("header string constant is not UTF-8"),
    }
}

/// Iterator over Assimp's `T**` arrays, skipping null entries.
pub(crate) struct PtrArray<'a, T> {
    items: &'a [*mut T],
    index: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> PtrArray<'a, T> {
    /// # Safety
    /// `ptr` must be null or point at `len` pointers, each null or valid for `'a`.
    pub(crate) unsafe fn new(ptr: *mut *mut T, len: usize) -> Self {
        Self {
            items: unsafe { slice(ptr as *const *mut T, len) },
            index: 0,
            _marker: PhantomData,
        }
    }

    /// The entry at `index`, if present and non-null.
    pub(crate) fn get(&self, index: usize) -> Option<&'a T> {
        let ptr = *self.items.get(index)?;
        unsafe { ptr.as_ref() }
    }
}

impl<'a, T> Iterator for PtrArray<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.items.len() {
            let ptr = self.items[self.index];
            self.index += 1;
            if let Some(item) = unsafe { ptr.as_ref() } {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items[self.index..]
            .iter()
            .filter(|ptr| !ptr.is_null())
            .count();
        (remaining, Some(remaining))
    }
}

// `size_hint` counts only the non-null entries still ahead.
impl<T> ExactSizeIterator for PtrArray<'_, T> {}

impl<T> Clone for PtrArray<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            index: self.index,
            _marker: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_or_empty_is_empty_slice() {
        let empty: &[u32] = unsafe { slice(std::ptr::null(), 4) };
        assert!(empty.is_empty());
        let data = [1u32, 2, 3];
        let zero: &[u32] = unsafe { slice(data.as_ptr(), 0) };
        assert!(zero.is_empty());
        assert!(unsafe { slice_opt::<u32>(std::ptr::null(), 3) }.is_none());
    }

    #[test]
    fn absurd_lengths_are_clamped() {
        let data = [0u64; 1];
        let s: &[u64] = unsafe { slice(data.as_ptr(), usize::MAX) };
        assert!(s.is_empty());
    }

    #[test]
    fn header_strings_drop_the_terminator() {
        const KEY: &str = header_str(b"PP_SBP_REMOVE\0");
        assert_eq!(KEY, "PP_SBP_REMOVE");
        assert_eq!(header_str(b"plain"), "plain");
    }

    #[test]
    fn ptr_array_skips_nulls() {
        let mut a = 1i32;
        let mut b = 2i32;
        let mut ptrs = [&mut a as *mut i32, std::ptr::null_mut(), &mut b as *mut i32];
        let values: Vec<i32> = unsafe { PtrArray::new(ptrs.as_mut_ptr(), ptrs.len()) }
            .copied()
            .collect();
        assert_eq!(values, vec![1, 2]);

        let mut iter = unsafe { PtrArray::new(ptrs.as_mut_ptr(), ptrs.len()) };
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
        iter.next();
        assert_eq!(iter.len(), 0);
        assert!(iter.next().is_none());

        let array = unsafe { PtrArray::new(ptrs.as_mut_ptr(), ptrs.len()) };
        assert_eq!(array.get(2), Some(&2));
        assert_eq!(array.get(1), None);
        assert_eq!(array.get(9), None);
    }
}
