use std::fs;
use std::path::Path;

/// Write a data directory with four problems of two examples each.
///
/// Problem 0 sorts an array, problem 1 takes the maximum plus one, problem 2
/// reverses the first two elements of an array, problem 3 has targets no
/// short program reaches.
pub fn write_data_dir(dir: &Path) {
    fs::write(dir.join("input_types.txt"), "Array\nArray\nInt Array\nArray\n").unwrap();
    fs::write(
        dir.join("input_values.txt"),
        "3 1 2\n5 -4\n1 9 4\n2 3\n2 | 7 8 9\n2 | 1 2\n1 2\n3\n",
    )
    .unwrap();
    fs::write(dir.join("output_types.txt"), "Array\nInt\nArray\nInt\n").unwrap();
    fs::write(
        dir.join("output_values.txt"),
        "1 2 3\n-4 5\n10\n4\n8 7\n2 1\n123457\n-99991\n",
    )
    .unwrap();
    fs::write(dir.join("prior.txt"), "0.9 SORT\n0.5 REVERSE\n0.4 TAKE\n").unwrap();
    fs::create_dir_all(dir.join("predictions")).unwrap();
    fs::write(dir.join("predictions").join("0.txt"), "0.8 REVERSE\n0.7 SORT\n").unwrap();
}
