use arbitrary::Unstructured;
use arbtest::{arbitrary, arbtest};
use strand_vector::{pack_sequence, pack_sequence_rev, Builder, Slice};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    Slice(usize, usize),
    Append(Vec<u32>),
    Copy,
    SplitLeft(usize),
    SplitRight(usize),
}

impl Op {
    fn apply_to_vec(&self, vec: &mut Vec<u32>) {
        match self {
            Op::Slice(start, len) => {
                if !vec.is_empty() {
                    let start = start % vec.len();
                    vec.drain(0..start);
                    vec.truncate(*len);
                }
            }
            Op::Append(xs) => vec.extend_from_slice(xs),
            Op::Copy => {}
            Op::SplitLeft(at) => {
                let at = at % (vec.len() + 1);
                vec.truncate(at);
            }
            Op::SplitRight(at) => {
                let at = at % (vec.len() + 1);
                vec.drain(0..at);
            }
        }
    }

    fn apply_to_slice(&self, slice: &mut Slice<u32>) {
        match self {
            Op::Slice(start, len) => {
                if !slice.is_empty() {
                    let start = start % slice.len();
                    let end = start.saturating_add(*len).min(slice.len());
                    *slice = slice.slice(start..end);
                }
            }
            Op::Append(xs) => {
                *slice = slice.append(&Slice::from_iter(xs.iter().copied()));
            }
            Op::Copy => {
                *slice = slice.to_copied();
            }
            Op::SplitLeft(at) => {
                let at = at % (slice.len() + 1);
                *slice = slice.split_at(at).0;
            }
            Op::SplitRight(at) => {
                let at = at % (slice.len() + 1);
                *slice = slice.split_at(at).1;
            }
        }
    }
}

// u.arbitrary() generates very short vecs by default:
// https://github.com/matklad/arbtest/issues/8
fn arb_vec(u: &mut Unstructured<'_>) -> arbitrary::Result<Vec<u32>> {
    let len = u.arbitrary_len::<u32>()?;
    std::iter::from_fn(|| Some(u.arbitrary::<u32>()))
        .take(len)
        .collect()
}

#[test]
fn slice_matches_vec_model() {
    arbtest(|u| {
        let mut vec: Vec<u32> = arb_vec(u)?;
        let mut slice: Slice<u32> = vec.iter().copied().collect();
        let ops: Vec<Op> = u.arbitrary()?;

        for op in ops {
            op.apply_to_vec(&mut vec);
            op.apply_to_slice(&mut slice);

            assert_eq!(vec, slice.iter().copied().collect::<Vec<_>>());
            assert_eq!(vec.len(), slice.len());
        }

        Ok(())
    });
}

#[test]
fn indexing_matches_vec_model() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let slice: Slice<u32> = vec.iter().copied().collect();
        let idx: usize = u.arbitrary()?;

        assert_eq!(slice.get(idx), vec.get(idx));
        assert_eq!(slice.first(), vec.first());
        assert_eq!(slice.last(), vec.last());

        Ok(())
    });
}

#[test]
fn packing_round_trips() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let guess: usize = u.arbitrary::<u8>()? as usize;

        let packed = pack_sequence(guess, vec.iter().copied());
        assert_eq!(packed.iter().copied().collect::<Vec<_>>(), vec);

        let packed_rev = pack_sequence_rev(guess, vec.iter().copied());
        let mut reversed = vec.clone();
        reversed.reverse();
        assert_eq!(packed_rev.iter().copied().collect::<Vec<_>>(), reversed);

        Ok(())
    });
}

#[test]
fn builder_doubling_bound() {
    arbtest(|u| {
        let vec: Vec<u32> = arb_vec(u)?;
        let guess: usize = u.arbitrary::<u8>()? as usize;

        let mut builder = Builder::with_capacity(guess);
        for x in &vec {
            builder.push(*x);
        }
        assert!(builder.capacity() >= vec.len());
        let frozen = builder.freeze();
        assert_eq!(frozen.iter().copied().collect::<Vec<_>>(), vec);

        Ok(())
    });
}

#[test]
fn concat_matches_flattening() {
    arbtest(|u| {
        let parts: Vec<Vec<u32>> = u.arbitrary()?;
        let slices: Vec<Slice<u32>> = parts
            .iter()
            .map(|p| Slice::from_iter(p.iter().copied()))
            .collect();

        let flat: Vec<u32> = parts.iter().flatten().copied().collect();
        let cat = Slice::concat(&slices);
        assert_eq!(cat.iter().copied().collect::<Vec<_>>(), flat);

        let flat_rev: Vec<u32> = parts.iter().rev().flatten().copied().collect();
        let cat_r = Slice::concat_r(&slices);
        assert_eq!(cat_r.iter().copied().collect::<Vec<_>>(), flat_rev);

        Ok(())
    });
}
