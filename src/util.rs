pub use split::{split_one, Rest};

mod split {
    use std::marker::PhantomData;

    pub struct Rest<'a, T> {
        split_index: usize,
        data: *mut T,
        len: usize,
        _marker: PhantomData<&'a mut ()>,
    }

    impl<'a, T> Rest<'a, T> {
        /// Get the value at position `i` of the underlying slice.
        /// Returns `None` if the index is out of bounds or is the index
        /// that was split off.
        pub fn get_mut<'b>(&'b mut self, i: usize) -> Option<&'b mut T> {
            unsafe {
                if self.split_index != i && i < self.len {
                    Some(&mut *self.data.add(i))
                } else {
                    None
                }
            }
        }

        pub fn get<'b>(&'b self, i: usize) -> Option<&'b T> {
            unsafe {
                if self.split_index != i && i < self.len {
                    Some(&*self.data.add(i))
                } else {
                    None
                }
            }
        }
    }

    /// Borrow one element of a slice mutably while keeping the remaining
    /// elements reachable through the returned [`Rest`] view.
    pub fn split_one<T>(slice: &mut [T], i: usize) -> Option<(&mut T, Rest<'_, T>)> {
        let len = slice.len();
        if i >= len {
            return None;
        }

        unsafe {
            let ptr = slice.as_mut_ptr();
            let value = &mut *ptr.add(i);
            let rest = Rest {
                split_index: i,
                data: ptr,
                len,
                _marker: PhantomData,
            };
            Some((value, rest))
        }
    }

}
