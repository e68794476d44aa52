/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Color space conversion routines.
//!
//! Every routine here operates on a component's full, already-upsampled and
//! already-cropped plane at once (see `worker::build_output`) rather than on
//! individual MCUs, so there is a single scalar implementation per
//! conversion instead of per-cpu-extension variants.

pub(crate) mod scalar;
