use base::{Tensor, TensorError};

#[test]
fn test_new_checks_element_count() {
    let t = Tensor::new(vec![1, 3, 2, 2], vec![0.0f32; 12]).unwrap();
    assert_eq!(t.shape, vec![1, 3, 2, 2]);
    assert_eq!(t.len(), 12);
}

#[test]
fn test_new_rejects_mismatch() {
    let err = Tensor::new(vec![2, 2], vec![1u8; 3]).unwrap_err();
    assert_eq!(err, TensorError::ShapeMismatch { expected: 4, got: 3 });
}

#[test]
fn test_new_rejects_overflow() {
    let err = Tensor::new(vec![usize::MAX, 2], Vec::<u8>::new()).unwrap_err();
    assert_eq!(err, TensorError::ShapeOverflow);
}

