use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use log::debug;
use tch::{CModule, Device, Kind};

use crate::{error::Result, input};

/**
A pretrained convolutional backbone exported with torchscript.
Its output for a single imagenet normalized image is flattened into the deep feature vector.
 */
#[derive(Clone)]
pub(crate) struct DeepBackbone {
    module: Arc<Mutex<CModule>>,
    device: Device,
}

impl DeepBackbone {
    pub(crate) fn load(path: &Path, device: Device) -> Result<Self> {
        let mut module = CModule::load_on_device(path, device)?;
        module.set_eval();
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            device,
        })
    }

    pub(crate) fn describe(&self, image_path: &Path) -> Result<Vec<f32>> {
        let input = input::load_imagenet(image_path, self.device)?;
        let output = {
            let module = self
                .module
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            tch::no_grad(|| module.forward_ts(&[input]))?
        };
        let output = output
            .flatten(0, -1)
            .to_kind(Kind::Float)
            .to_device(Device::Cpu);
        debug!("Backbone produced {} deep features for {:?}", output.numel(), image_path);
        Ok(super::to_vec(&output))
    }
}
