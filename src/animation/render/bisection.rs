/*
Copyright 2021 - 2022 Jakub Lewandowski

This file is part of Pressure-level Wind Animation (PRSWND).

Pressure-level Wind Animation (PRSWND) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Pressure-level Wind Animation (PRSWND) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Pressure-level Wind Animation (PRSWND). If not, see https://www.gnu.org/licenses/.
*/

//! Module containg methods for conducting
//! binary search (bisection) of elements closests
//! to searched values in coordinate arrays.
//!
//! Coordinates can be sorted ascendingly or descendingly,
//! as latitudes in model output often go from north to south.

use crate::errors::SearchError;
use crate::Float;

/// Core bisection function, an implementation of binary search
/// algorithm returning the first index at which the array
/// reaches or passes the searched value.
fn binary_search(array: &[Float], x: Float) -> Result<usize, SearchError> {
    let (first, last) = match (array.first(), array.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(SearchError::EmptyArray),
    };

    if x < first && x < last || x > first && x > last {
        return Err(SearchError::OutOfBounds);
    }

    let ascending = first <= last;

    let mut lo = 0;
    let mut hi = array.len() - 1;

    while lo < hi {
        let mid = (lo + hi) / 2;

        let passed = if ascending {
            array[mid] >= x
        } else {
            array[mid] <= x
        };

        if passed {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    Ok(lo)
}

/// Finds the index of the coordinate closest to the searched value.
///
/// Values outside of coordinates range, but not further than
/// half of the edge grid spacing, are assigned to the edge cell.
pub fn find_nearest(array: &[Float], x: Float) -> Result<usize, SearchError> {
    match binary_search(array, x) {
        Ok(0) => Ok(0),
        Ok(found) => {
            if (array[found] - x).abs() < (array[found - 1] - x).abs() {
                Ok(found)
            } else {
                Ok(found - 1)
            }
        }
        Err(SearchError::OutOfBounds) => edge_cell(array, x),
        Err(err) => Err(err),
    }
}

fn edge_cell(array: &[Float], x: Float) -> Result<usize, SearchError> {
    let last = array.len() - 1;

    if last == 0 {
        return Err(SearchError::OutOfBounds);
    }

    let half_first = (array[1] - array[0]).abs() / 2.0;
    let half_last = (array[last] - array[last - 1]).abs() / 2.0;

    if (array[0] - x).abs() <= half_first {
        Ok(0)
    } else if (array[last] - x).abs() <= half_last {
        Ok(last)
    } else {
        Err(SearchError::OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::find_nearest;
    use crate::errors::SearchError;

    #[test]
    fn ascending() {
        let lons = [140.0, 141.0, 142.0, 143.0];

        assert_eq!(find_nearest(&lons, 140.0).unwrap(), 0);
        assert_eq!(find_nearest(&lons, 141.4).unwrap(), 1);
        assert_eq!(find_nearest(&lons, 141.6).unwrap(), 2);
        assert_eq!(find_nearest(&lons, 143.0).unwrap(), 3);
        assert_eq!(find_nearest(&lons, 143.4).unwrap(), 3);
        assert_eq!(find_nearest(&lons, 139.6).unwrap(), 0);
    }

    #[test]
    fn descending() {
        let lats = [-10.0, -10.5, -11.0, -11.5];

        assert_eq!(find_nearest(&lats, -10.1).unwrap(), 0);
        assert_eq!(find_nearest(&lats, -10.9).unwrap(), 2);
        assert_eq!(find_nearest(&lats, -11.5).unwrap(), 3);
    }

    #[test]
    fn outside() {
        assert!(matches!(
            find_nearest(&[1.0, 2.0], 5.0),
            Err(SearchError::OutOfBounds)
        ));
        assert!(matches!(
            find_nearest(&[], 5.0),
            Err(SearchError::EmptyArray)
        ));
        assert!(matches!(
            find_nearest(&[1.0], 1.5),
            Err(SearchError::OutOfBounds)
        ));
        assert_eq!(find_nearest(&[1.0], 1.0).unwrap(), 0);
    }
}
