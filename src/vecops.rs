// Copyright (c) 2026  The SolarSizer developers

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

// -----------------------------------------------------------------------------------
// Vector utilities for period (monthly) series
// -----------------------------------------------------------------------------------

use num::{Float, Zero};

// Elementwise difference res[i] = vec1[i] - vec2[i]
pub fn vecvecdif<T: Float>(vec1: &[T], vec2: &[T]) -> Vec<T> {
    vec1.iter()
        .enumerate()
        .map(|(ii, el)| *el - *vec2.get(ii).unwrap_or(&Zero::zero()))
        .collect()
}

// Elementwise multiplication res[i] = vec1[i] * vec2[i]
pub fn vecvecmul<T: Float>(vec1: &[T], vec2: &[T]) -> Vec<T> {
    vec1.iter()
        .enumerate()
        .map(|(ii, el)| *el * *vec2.get(ii).unwrap_or(&Zero::zero()))
        .collect()
}

// Multiply vector by scalar
pub fn veckmul<T: Float>(vec1: &[T], k: T) -> Vec<T> {
    vec1.iter().map(|el| *el * k).collect()
}

// Sum all elements in a vector
pub fn vecsum<'a, T>(vec: &'a [T]) -> T
where
    T: Float + std::iter::Sum<&'a T>,
{
    vec.iter().sum()
}

// Check that a series is a valid distribution: non negative values adding up to 1 +- tol
pub fn is_distribution<T: Float + std::iter::Sum<T>>(vec: &[T], tol: T) -> bool {
    let total: T = vec.iter().copied().sum();
    vec.iter().all(|v| v.is_finite() && *v >= Zero::zero()) && (total - T::one()).abs() <= tol
}
