/*!
Rotation invariant uniform local binary patterns.
 */
use tch::{Kind, Tensor};

pub(crate) const DEFAULT_POINTS: i64 = 57;
pub(crate) const DEFAULT_RADIUS: f64 = 4.0;

const EPS: f64 = 1e-7;

/**
Offset (row, col) of the `p`th of `points` neighbours sitting on a circle of radius `radius`.
 */
fn neighbour_offset(p: i64, points: i64, radius: f64) -> (f64, f64) {
    let round5 = |x: f64| (x * 1e5).round() / 1e5;
    let angle = 2.0 * std::f64::consts::PI * p as f64 / points as f64;
    (round5(-radius * angle.sin()), round5(radius * angle.cos()))
}

/**
Compute the uniform LBP code of every pixel.
# Arguments
* `gray` - [H, W] tensor
# Returns
* [H, W] int64 tensor with codes in [0, points + 1]
 */
pub(crate) fn lbp_codes(gray: &Tensor, points: i64, radius: f64) -> Tensor {
    let gray = gray.to_kind(Kind::Double);
    let size = gray.size();
    let (h, w) = (size[0], size[1]);

    // Neighbours outside the image read as 0
    let pad = radius.ceil() as i64 + 1;
    let padded = gray.constant_pad_nd([pad, pad, pad, pad].as_slice());
    let shifted = |dr: i64, dc: i64| padded.narrow(0, pad + dr, h).narrow(1, pad + dc, w);

    // Running sums over the neighbours, keeping only the previous bit around
    let mut set = Tensor::zeros(&[h, w], (Kind::Int64, gray.device()));
    let mut changes = Tensor::zeros(&[h, w], (Kind::Int64, gray.device()));
    let mut previous: Option<Tensor> = None;
    for p in 0..points {
        let (rp, cp) = neighbour_offset(p, points, radius);
        let (fr, fc) = (rp.floor(), cp.floor());
        let (dr, dc) = (rp - fr, cp - fc);
        let (fr, fc) = (fr as i64, fc as i64);

        let top = shifted(fr, fc) * (1.0 - dc) + shifted(fr, fc + 1) * dc;
        let bottom = shifted(fr + 1, fc) * (1.0 - dc) + shifted(fr + 1, fc + 1) * dc;
        let texture = top * (1.0 - dr) + bottom * dr;
        let bit = texture.ge_tensor(&gray); // [H, W] bool

        set += bit.to_kind(Kind::Int64);
        if let Some(previous) = &previous {
            changes += bit.ne_tensor(previous).to_kind(Kind::Int64);
        }
        previous = Some(bit);
    }

    let non_uniform = set.full_like(points + 1);
    set.where_self(&changes.le(2), &non_uniform)
}

/**
Normalized histogram of the uniform LBP codes of an image.
# Arguments
* `gray` - [H, W] tensor
# Returns
* [points + 2] float tensor
 */
pub(crate) fn lbp_histogram(gray: &Tensor, points: i64, radius: f64) -> Tensor {
    let codes = lbp_codes(gray, points, radius);
    let hist = codes
        .flatten(0, -1)
        .bincount::<Tensor>(None, points + 2)
        .to_kind(Kind::Double);
    let total = hist.sum(Kind::Double) + EPS;
    (hist / total).to_kind(Kind::Float)
}
