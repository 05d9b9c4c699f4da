mod test_sampler_basic;
