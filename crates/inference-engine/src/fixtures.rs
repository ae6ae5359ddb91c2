//! Tiny ONNX classifiers encoded by hand for tract tests.
//!
//! The graph is `ReduceMean(spatial) -> MatMul(weights) -> Softmax`: each
//! channel is averaged over the image, the three means are mixed into two
//! logits, and the logits become probabilities. A solid red image therefore
//! scores `softmax(weights[0])`.

use std::path::PathBuf;

use crate::config::TensorLayout;

const FLOAT: u64 = 1;
const ATTR_INT: u64 = 2;
const ATTR_INTS: u64 = 7;

fn varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn uint_field(out: &mut Vec<u8>, field: u64, value: u64) {
    varint(out, field << 3);
    varint(out, value);
}

fn bytes_field(out: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    varint(out, (field << 3) | 2);
    varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

fn str_field(out: &mut Vec<u8>, field: u64, value: &str) {
    bytes_field(out, field, value.as_bytes());
}

fn value_info(name: &str, dims: &[usize]) -> Vec<u8> {
    let mut shape = Vec::new();
    for &dim in dims {
        let mut d = Vec::new();
        uint_field(&mut d, 1, dim as u64);
        bytes_field(&mut shape, 1, &d);
    }

    let mut tensor = Vec::new();
    uint_field(&mut tensor, 1, FLOAT);
    bytes_field(&mut tensor, 2, &shape);

    let mut ty = Vec::new();
    bytes_field(&mut ty, 1, &tensor);

    let mut info = Vec::new();
    str_field(&mut info, 1, name);
    bytes_field(&mut info, 2, &ty);
    info
}

fn attr_int(name: &str, value: u64) -> Vec<u8> {
    let mut attr = Vec::new();
    str_field(&mut attr, 1, name);
    uint_field(&mut attr, 3, value);
    uint_field(&mut attr, 20, ATTR_INT);
    attr
}

fn attr_ints(name: &str, values: &[u64]) -> Vec<u8> {
    let mut attr = Vec::new();
    str_field(&mut attr, 1, name);
    for &v in values {
        uint_field(&mut attr, 8, v);
    }
    uint_field(&mut attr, 20, ATTR_INTS);
    attr
}

fn node(op: &str, inputs: &[&str], output: &str, attrs: &[Vec<u8>]) -> Vec<u8> {
    let mut n = Vec::new();
    for input in inputs {
        str_field(&mut n, 1, input);
    }
    str_field(&mut n, 2, output);
    str_field(&mut n, 3, &op.to_lowercase());
    str_field(&mut n, 4, op);
    for attr in attrs {
        bytes_field(&mut n, 5, attr);
    }
    n
}

fn weights_initializer(weights: [[f32; 2]; 3]) -> Vec<u8> {
    let mut t = Vec::new();
    uint_field(&mut t, 1, 3);
    uint_field(&mut t, 1, 2);
    uint_field(&mut t, 2, FLOAT);
    str_field(&mut t, 8, "weights");
    let raw: Vec<u8> = weights
        .iter()
        .flatten()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    bytes_field(&mut t, 9, &raw);
    t
}

/// Serialized ONNX model taking a `[1,224,224,3]` (NHWC) or `[1,3,224,224]`
/// (NCHW) input and producing two probabilities
pub fn classifier_onnx(layout: TensorLayout, weights: [[f32; 2]; 3]) -> Vec<u8> {
    let spatial_axes: &[u64] = match layout {
        TensorLayout::Nhwc => &[1, 2],
        TensorLayout::Nchw => &[2, 3],
    };

    let mut graph = Vec::new();
    bytes_field(
        &mut graph,
        1,
        &node(
            "ReduceMean",
            &["input"],
            "pooled",
            &[attr_ints("axes", spatial_axes), attr_int("keepdims", 0)],
        ),
    );
    bytes_field(&mut graph, 1, &node("MatMul", &["pooled", "weights"], "logits", &[]));
    bytes_field(
        &mut graph,
        1,
        &node("Softmax", &["logits"], "scores", &[attr_int("axis", 1)]),
    );
    str_field(&mut graph, 2, "face-classifier-fixture");
    bytes_field(&mut graph, 5, &weights_initializer(weights));
    bytes_field(&mut graph, 11, &value_info("input", &layout.shape(224, 224)));
    bytes_field(&mut graph, 12, &value_info("scores", &[1, 2]));

    let mut opset = Vec::new();
    uint_field(&mut opset, 2, 13);

    let mut model = Vec::new();
    uint_field(&mut model, 1, 7);
    str_field(&mut model, 2, "face-classifier-tests");
    bytes_field(&mut model, 7, &graph);
    bytes_field(&mut model, 8, &opset);
    model
}

/// Write [`classifier_onnx`] to a per-test temp file and return its path
pub fn write_classifier(name: &str, layout: TensorLayout, weights: [[f32; 2]; 3]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "face-classifier-{}-{}.onnx",
        name,
        std::process::id()
    ));
    std::fs::write(&path, classifier_onnx(layout, weights)).unwrap();
    path
}
